// ==============================================================================
// lib.rs - SNP/Phenotype Processor Library
// ==============================================================================
// Description: Shared merge/classify pipeline for CLI and API gateway
// Author: Matt Barham
// Created: 2026-08-23
// Modified: 2026-08-23
// Version: 1.0.0
// ==============================================================================

pub mod engine;
pub mod models;
pub mod parsers;
pub mod pipeline;
