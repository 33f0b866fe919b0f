//! Relay-style cursor pagination.
//!
//! Cursors are base64url-encoded v7 ids. Because v7 ids sort by creation
//! time, `ORDER BY id` gives a stable order and the cursor alone locates
//! the page boundary.
//!
//! ```rust,ignore
//! let args = PaginationArgs::forward(20, after).validate()?;
//! let (rows, has_more) = Notification::find_page(member_id, false, &args, pool).await?;
//! let page_info = build_page_info(has_more, &args, first_cursor, last_cursor);
//! ```

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use juniper::GraphQLObject;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i32 = 25;
const MAX_PAGE_SIZE: i32 = 100;

/// Opaque page cursor codec.
pub struct Cursor;

impl Cursor {
    pub fn encode_uuid(id: Uuid) -> String {
        URL_SAFE_NO_PAD.encode(id.as_bytes())
    }

    pub fn decode(s: &str) -> Result<Uuid> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .context("Invalid cursor: not valid base64")?;
        Uuid::from_slice(&bytes).context("Invalid cursor: not a valid id")
    }
}

#[derive(Debug, Clone, Default, GraphQLObject)]
#[graphql(description = "Information about pagination in a connection")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationDirection {
    Forward,
    Backward,
}

/// Raw `first/after/last/before` arguments from a resolver.
#[derive(Debug, Clone, Default)]
pub struct PaginationArgs {
    pub first: Option<i32>,
    pub after: Option<String>,
    pub last: Option<i32>,
    pub before: Option<String>,
}

impl PaginationArgs {
    pub fn forward(first: i32, after: Option<String>) -> Self {
        Self {
            first: Some(first),
            after,
            ..Default::default()
        }
    }

    /// Reject mixed directions, clamp the page size and decode the cursor.
    pub fn validate(&self) -> Result<ValidatedPaginationArgs, &'static str> {
        let forward = self.first.is_some() || self.after.is_some();
        let backward = self.last.is_some() || self.before.is_some();
        if forward && backward {
            return Err("Cannot use first/after with last/before");
        }

        let (direction, size, cursor) = if backward {
            (PaginationDirection::Backward, self.last, self.before.as_deref())
        } else {
            (PaginationDirection::Forward, self.first, self.after.as_deref())
        };

        let cursor = match cursor {
            Some(raw) => Some(Cursor::decode(raw).map_err(|_| "Invalid cursor")?),
            None => None,
        };

        Ok(ValidatedPaginationArgs {
            limit: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            cursor,
            direction,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedPaginationArgs {
    pub limit: i32,
    pub cursor: Option<Uuid>,
    pub direction: PaginationDirection,
}

impl ValidatedPaginationArgs {
    /// One extra row tells us whether another page exists.
    pub fn fetch_limit(&self) -> i64 {
        i64::from(self.limit) + 1
    }

    pub fn is_forward(&self) -> bool {
        self.direction == PaginationDirection::Forward
    }
}

pub fn build_page_info(
    has_more: bool,
    args: &ValidatedPaginationArgs,
    start_cursor: Option<String>,
    end_cursor: Option<String>,
) -> PageInfo {
    let (has_next_page, has_previous_page) = match args.direction {
        PaginationDirection::Forward => (has_more, args.cursor.is_some()),
        PaginationDirection::Backward => (args.cursor.is_some(), has_more),
    };

    PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor,
        end_cursor,
    }
}

/// Drop the lookahead row fetched by `fetch_limit`.
pub fn trim_results<T>(mut results: Vec<T>, limit: i32) -> (Vec<T>, bool) {
    let limit = limit.max(0) as usize;
    let has_more = results.len() > limit;
    results.truncate(limit);
    (results, has_more)
}
