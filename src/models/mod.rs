pub mod analysis_result;
pub mod password_reset;
pub mod subscription;
pub mod upload;
pub mod user;

// Re-export common types
pub use analysis_result::{
    AnalysisDataType, AnalysisResult, AnalysisResultResponse, NewAnalysisResult,
    SaveAnalysisResultRequest,
};
pub use password_reset::{
    ConfirmPasswordResetRequest, NewPasswordReset, PasswordReset, RequestPasswordResetRequest,
};
pub use subscription::{
    NewSubscription, PlanType, Subscription, SubscriptionResponse, SubscriptionStatus,
    UpsertSubscriptionRequest,
};
pub use upload::{
    CreateUploadRequest, DeclaredFileType, NewUserDataUpload, UpdateSummariesRequest,
    UpdateUploadStatusRequest, UploadResponse, UploadStatus, UserDataUpload,
};
pub use user::{CreateUserRequest, NewUser, UpdateUserRequest, User, UserResponse};
