use crate::error::{AppError, Result};

/// 评论内容校验
/// 在发出任何请求之前于客户端完成；空白内容直接拦截。
pub fn validate_comment_content(content: &str, max_length: usize) -> Result<()> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Comment content cannot be empty".to_string(),
        ));
    }

    if trimmed.chars().count() > max_length {
        return Err(AppError::Validation(format!(
            "Comment cannot exceed {} characters",
            max_length
        )));
    }

    Ok(())
}

/// 举报理由校验
pub fn validate_report_reason(reason: &str, max_length: usize) -> Result<()> {
    let trimmed = reason.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Report reason cannot be empty".to_string(),
        ));
    }

    if trimmed.chars().count() > max_length {
        return Err(AppError::Validation(format!(
            "Report reason cannot exceed {} characters",
            max_length
        )));
    }

    Ok(())
}
