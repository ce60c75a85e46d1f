/*
 * Responsibility
 * - Request extractors shared by the v1 handlers
 *   - auth_ctx: the authenticated caller (from the access middleware)
 *   - input: Json/Path/Query wrappers whose rejections use the AppError body
 */
pub mod auth_ctx;
pub mod input;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use input::{ApiJson, ApiPath, ApiQuery};
