/*
 * Responsibility
 * - Versioned HTTP API surface
 */
pub mod v1;
