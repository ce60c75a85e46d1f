/*
 * Responsibility
 * - Process-wide services shared through AppState (credential verification, authorization)
 */
pub mod auth;
