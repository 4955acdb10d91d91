use crate::utils::app_error::AppError;

pub async fn not_found_route() -> AppError {
    AppError::not_found_error()
}
