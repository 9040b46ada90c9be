pub mod analysis_result;
pub mod password_reset;
pub mod subscription;
pub mod upload;
pub mod user;

pub use analysis_result::AnalysisResultService;
pub use password_reset::{PasswordResetService, ResetTokenInfo};
pub use subscription::SubscriptionService;
pub use upload::UploadService;
pub use user::UserService;
