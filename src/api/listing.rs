//! # Listing
//!
//! Builds one page of `GET /pessoas`:
//!
//! 1. `t` must be present and non-empty
//! 2. `pagina` is decoded into the lower bound and the page is fetched
//! 3. with a cursor in use, a previous link is emitted by popping the
//!    navigation stack
//! 4. a full page gets a next link carrying the cursor of its last record,
//!    with the cursor in use pushed onto the stack
//!
//! A page that happens to be exactly full still advertises a next link; the
//! page behind it is simply empty.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::pagination::{Cursor, ListQuery, NavigationStack, PAGE_SIZE};
use crate::person::Person;

use super::{ApiError, ApiResult, AppContext, Deadline};

/// Path every navigation link points at.
const LISTING_PATH: &str = "/pessoas";

/// Query string of `GET /pessoas`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    /// Search term, mandatory
    pub t: Option<String>,

    /// Cursor of the page to fetch
    pub pagina: Option<String>,

    /// Comma-joined cursors of earlier pages
    #[serde(rename = "paginationStack")]
    pub pagination_stack: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeoplePage {
    pub resultados: Vec<Person>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anterior: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxima: Option<String>,
}

/// Fetch the page described by `params`.
pub async fn list_people(
    ctx: &AppContext,
    deadline: Deadline,
    params: &ListParams,
) -> ApiResult<PeoplePage> {
    let term = params
        .t
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingParam("t"))?;
    let cursor = params.pagina.as_deref().filter(|c| !c.is_empty());

    let query = ListQuery::compose(Some(term), cursor);
    let people = deadline.run("storage", ctx.store().list(&query)).await?;

    let links = PageLinks::build(term, cursor, params.pagination_stack.as_deref(), &people);

    Ok(PeoplePage {
        resultados: people,
        anterior: links.previous,
        proxima: links.next,
    })
}

/// Navigation links of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    /// `cursor` is the cursor the page was fetched with, `stack` the raw
    /// navigation stack sent alongside it.
    pub fn build(term: &str, cursor: Option<&str>, stack: Option<&str>, page: &[Person]) -> Self {
        let stack = stack.map(NavigationStack::parse).unwrap_or_default();

        let previous = cursor.map(|_| {
            let mut earlier = stack.clone();
            let target = earlier.pop();
            page_link(term, target.as_deref(), &earlier)
        });

        let next = (page.len() == PAGE_SIZE).then(|| {
            let mut trail = stack.clone();
            if let Some(current) = cursor {
                trail.push(current);
            }
            page_link(term, Some(&Cursor::encode_page(page)), &trail)
        });

        Self { previous, next }
    }
}

fn page_link(term: &str, cursor: Option<&str>, stack: &NavigationStack) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("t", term);
    if let Some(cursor) = cursor {
        query.append_pair("pagina", cursor);
    }
    if let Some(stack) = stack.encode() {
        query.append_pair("paginationStack", &stack);
    }
    format!("{LISTING_PATH}?{}", query.finish())
}
