/*
 * Responsibility
 * - Request/response DTOs
 */
pub mod body;
pub mod coerce;
pub mod posts;
