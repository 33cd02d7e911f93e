use shared::{
    domain::Requirement,
    error::ApiError,
    protocol::{ActionData, CategoryPageView, CategorySummary, Subject, SUBJECT_FIELD},
};

use crate::{
    auth::Identity,
    compose,
    forms::PageCategoryInput,
    mutation::{self, PersistenceError},
    validate::{parse_form, single_error},
    ApiContext, PageRequest, Responded,
};

pub const ROUTE: &str = "/admin/pages";

pub async fn prepare_view(
    ctx: &ApiContext,
    request: &PageRequest,
) -> Result<CategoryPageView, ApiError> {
    ctx.authorizer.authorize(request, Requirement::ADMIN).await?;

    let categories = ctx
        .store
        .list_page_categories()
        .await
        .map_err(PersistenceError::from)?
        .into_iter()
        .map(|category| CategorySummary {
            category_id: category.category_id,
            name: category.name,
            created_at: category.created_at,
        })
        .collect();

    Ok(CategoryPageView {
        categories,
        status: 200,
    })
}

/// Routes on the `_subject` field; the modal hosts more than one form.
pub async fn handle_submission(
    ctx: &ApiContext,
    request: &PageRequest,
) -> Result<ActionData, ApiError> {
    let identity = ctx.authorizer.authorize(request, Requirement::ADMIN).await?;
    request.payload()?;

    match request.subject() {
        Some(Subject::PageCategory) => create_category(ctx, &identity, request).await,
        None => Err(ApiError::validation(single_error(
            SUBJECT_FIELD,
            "Unknown form subject",
        ))),
    }
}

async fn create_category(
    ctx: &ApiContext,
    identity: &Identity,
    request: &PageRequest,
) -> Result<ActionData, ApiError> {
    let input: PageCategoryInput =
        parse_form(request.payload()?).map_err(ApiError::validation)?;
    let category = mutation::create_page_category(ctx.store.as_ref(), identity, &input).await?;

    Ok(ActionData {
        category: Some(category),
        status: 200,
        ..ActionData::default()
    })
}

pub async fn loader(ctx: &ApiContext, request: &PageRequest) -> Responded {
    compose(prepare_view(ctx, request).await)
}

pub async fn action(ctx: &ApiContext, request: &PageRequest) -> Responded {
    compose(handle_submission(ctx, request).await)
}

#[cfg(test)]
#[path = "../tests/page_admin_tests.rs"]
mod tests;
