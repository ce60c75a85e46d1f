/*
 * Responsibility
 * - access: bearer token → Principal in request extensions (401 on failure)
 * - policy: named claims policy over that Principal (403 on denial)
 */
pub mod access;
pub mod policy;
