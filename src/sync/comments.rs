use crate::{
    api::ApiClient,
    config::Config,
    error::{AppError, Result},
    models::comment::{Comment, CommentNode, CreateCommentRequest, ReportCommentRequest, UpdateCommentRequest},
    models::interaction::InteractionKind,
    sync::notices::NoticeQueue,
    sync::optimistic::InFlightTable,
    utils::validation::{validate_comment_content, validate_report_reason},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use validator::Validate;

/// Build the threaded forest from the flat comment list. Two passes:
/// index every id, then attach each comment to its parent's ordered
/// replies list (or the root list for `parent_comment_id = None`).
///
/// A comment whose parent is absent from the batch — typically already
/// deleted — is dropped from the forest, not promoted to root: a reply
/// rendered without its parent reads as a non sequitur. Sibling order
/// preserves the flat list's order; no re-sorting happens here.
pub fn build_comment_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let index: HashMap<i64, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_comment_id {
            None => roots.push(i),
            Some(parent_id) => match index.get(&parent_id) {
                // A self-referential parent link is corrupt data; treat
                // it like an unresolved parent.
                Some(&parent_index) if parent_index != i => children[parent_index].push(i),
                _ => {
                    debug!(
                        "Dropping comment {} with unresolved parent {}",
                        comment.id, parent_id
                    );
                }
            },
        }
    }

    let mut nodes: Vec<Option<CommentNode>> = comments
        .into_iter()
        .map(|c| Some(CommentNode::new(c)))
        .collect();

    fn assemble(
        i: usize,
        children: &[Vec<usize>],
        nodes: &mut [Option<CommentNode>],
    ) -> Option<CommentNode> {
        let mut node = nodes[i].take()?;
        for &child in &children[i] {
            if let Some(child_node) = assemble(child, children, nodes) {
                node.replies.push(child_node);
            }
        }
        Some(node)
    }

    roots
        .iter()
        .filter_map(|&i| assemble(i, &children, &mut nodes))
        .collect()
}

/// 评论同步服务：拉取文章的评论森林，并承载发表/编辑/删除/点赞/举报。
/// 校验在发请求之前于客户端完成。
pub struct CommentService {
    api: Arc<ApiClient>,
    notices: Arc<NoticeQueue>,
    in_flight: InFlightTable,
    max_comment_length: usize,
    max_reply_depth: usize,
    max_report_reason_length: usize,
}

impl CommentService {
    pub fn new(api: Arc<ApiClient>, notices: Arc<NoticeQueue>, config: &Config) -> Self {
        Self {
            api,
            notices,
            in_flight: InFlightTable::new(),
            max_comment_length: config.max_comment_length,
            max_reply_depth: config.max_reply_depth,
            max_report_reason_length: config.max_report_reason_length,
        }
    }

    pub async fn load_thread(&self, article_id: i64) -> Result<Vec<CommentNode>> {
        let comments = self.api.fetch_comments(article_id).await?;
        debug!(
            "Loaded {} comments for article {}",
            comments.len(),
            article_id
        );
        Ok(build_comment_tree(comments))
    }

    /// Replying is permitted only while the current nesting depth is
    /// below the cap; deeper nodes still render but are terminal.
    pub fn can_reply(&self, depth: usize) -> bool {
        depth < self.max_reply_depth
    }

    pub async fn post_comment(
        &self,
        article_id: i64,
        parent_comment_id: Option<i64>,
        content: &str,
    ) -> Result<Comment> {
        self.require_auth("join the discussion")?;
        validate_comment_content(content, self.max_comment_length)?;

        let request = CreateCommentRequest {
            article_id,
            parent_comment_id,
            content: content.trim().to_string(),
        };
        request.validate().map_err(AppError::ValidatorError)?;

        match self.api.create_comment(&request).await {
            Ok(comment) => {
                self.notices.success("Comment posted");
                Ok(comment)
            }
            Err(err) => {
                warn!("Failed to post comment on article {}: {}", article_id, err);
                self.notices.error("Could not post comment. Please try again.");
                Err(err)
            }
        }
    }

    pub async fn edit_comment(&self, comment_id: i64, content: &str) -> Result<Comment> {
        self.require_auth("edit comments")?;
        validate_comment_content(content, self.max_comment_length)?;

        let request = UpdateCommentRequest {
            content: content.trim().to_string(),
        };
        request.validate().map_err(AppError::ValidatorError)?;

        match self.api.update_comment(comment_id, &request).await {
            Ok(comment) => {
                self.notices.success("Comment updated");
                Ok(comment)
            }
            Err(err) => {
                warn!("Failed to edit comment {}: {}", comment_id, err);
                self.notices.error("Could not update comment. Please try again.");
                Err(err)
            }
        }
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<()> {
        self.require_auth("delete comments")?;

        match self.api.delete_comment(comment_id).await {
            Ok(()) => {
                self.notices.success("Comment deleted");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to delete comment {}: {}", comment_id, err);
                self.notices.error("Could not delete comment. Please try again.");
                Err(err)
            }
        }
    }

    /// Like a comment. Guarded per comment so a double click cannot send
    /// two overlapping requests; the caller adjusts its rendered count
    /// from the returned result.
    pub async fn like_comment(&self, comment_id: i64) -> Result<()> {
        self.require_auth("like comments")?;
        let _guard = self.in_flight.try_begin(comment_id, InteractionKind::Like)?;

        match self.api.like_comment(comment_id).await {
            Ok(()) => {
                self.notices.success("Comment liked");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to like comment {}: {}", comment_id, err);
                self.notices.error("Could not like comment. Please try again.");
                Err(err)
            }
        }
    }

    pub fn is_like_requesting(&self, comment_id: i64) -> bool {
        self.in_flight.is_in_flight(comment_id, InteractionKind::Like)
    }

    pub async fn report_comment(&self, comment_id: i64, reason: &str) -> Result<()> {
        self.require_auth("report comments")?;
        validate_report_reason(reason, self.max_report_reason_length)?;

        let request = ReportCommentRequest {
            reason: reason.trim().to_string(),
        };
        request.validate().map_err(AppError::ValidatorError)?;

        match self.api.report_comment(comment_id, &request).await {
            Ok(()) => {
                self.notices.success("Report submitted. Thank you.");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to report comment {}: {}", comment_id, err);
                self.notices.error("Could not submit report. Please try again.");
                Err(err)
            }
        }
    }

    fn require_auth(&self, action: &str) -> Result<()> {
        if self.api.optional_token().is_some() {
            return Ok(());
        }
        self.notices.error(format!("Please sign in to {}", action));
        Err(AppError::unauthorized(&format!(
            "Sign in required to {}",
            action
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: i64, parent: Option<i64>) -> Comment {
        Comment {
            id,
            article_id: 1,
            parent_comment_id: parent,
            author_id: 10,
            author_name: "ada".to_string(),
            author_avatar: None,
            content: format!("comment {}", id),
            like_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn builds_nested_tree_and_drops_orphans() {
        // The worked example: 4's parent 999 never arrives, so 4 is
        // dropped (the promote-to-root reading was rejected; see
        // DESIGN.md).
        let flat = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, Some(999)),
        ];

        let tree = build_comment_tree(flat);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].comment.id, 1);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].comment.id, 2);
        assert_eq!(tree[0].replies[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].replies[0].comment.id, 3);
    }

    #[test]
    fn preserves_flat_list_order_within_siblings() {
        let flat = vec![
            comment(1, None),
            comment(5, Some(1)),
            comment(3, Some(1)),
            comment(4, Some(1)),
            comment(2, None),
        ];

        let tree = build_comment_tree(flat);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].comment.id, 1);
        assert_eq!(tree[1].comment.id, 2);
        let reply_ids: Vec<i64> = tree[0].replies.iter().map(|n| n.comment.id).collect();
        assert_eq!(reply_ids, vec![5, 3, 4]);
    }

    #[test]
    fn reply_arriving_before_parent_still_attaches() {
        let flat = vec![comment(2, Some(1)), comment(1, None)];
        let tree = build_comment_tree(flat);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].comment.id, 1);
        assert_eq!(tree[0].replies[0].comment.id, 2);
    }

    #[test]
    fn corrupt_parent_links_never_loop() {
        // Self-reference and a two-cycle: both unreachable from any
        // root, both dropped.
        let flat = vec![
            comment(1, None),
            comment(2, Some(2)),
            comment(3, Some(4)),
            comment(4, Some(3)),
        ];

        let tree = build_comment_tree(flat);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].comment.id, 1);
        assert!(tree[0].replies.is_empty());
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        assert!(build_comment_tree(Vec::new()).is_empty());
    }

    #[test]
    fn deep_chains_render_beyond_reply_cap() {
        // Depth is a reply affordance, not a rendering limit.
        let flat = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, Some(3)),
            comment(5, Some(4)),
        ];

        let tree = build_comment_tree(flat);
        let mut depth = 0;
        let mut node = &tree[0];
        while let Some(next) = node.replies.first() {
            node = next;
            depth += 1;
        }
        assert_eq!(depth, 4);
    }
}
