use std::collections::BTreeMap;

use shared::{
    domain::Requirement,
    error::ApiError,
    protocol::{ActionData, PizzaPageView, PizzaSummary},
};

use crate::{
    compose,
    forms::PizzaSelectionInput,
    mutation::{self, PersistenceError},
    session::{commit_session, revalidate},
    validate::parse_form,
    ApiContext, PageRequest, Responded,
};

pub const ROUTE: &str = "/admin/lab/pizza";

pub async fn prepare_view(ctx: &ApiContext, request: &PageRequest) -> Result<PizzaPageView, ApiError> {
    let identity = ctx.authorizer.authorize(request, Requirement::LAB).await?;

    let pizzas = ctx
        .store
        .list_pizzas()
        .await
        .map_err(PersistenceError::from)?
        .into_iter()
        .map(|pizza| PizzaSummary {
            uuid: pizza.uuid,
            name: pizza.name,
            price: pizza.price_cents,
        })
        .collect();

    Ok(PizzaPageView {
        pizzas,
        pizza_uuid: identity.pizza_uuid,
        status: 200,
    })
}

pub async fn handle_submission(
    ctx: &ApiContext,
    request: &PageRequest,
) -> Result<ActionData, ApiError> {
    let identity = ctx.authorizer.authorize(request, Requirement::LAB).await?;

    let input: PizzaSelectionInput =
        parse_form(request.payload()?).map_err(ApiError::validation)?;
    mutation::select_pizza(ctx.store.as_ref(), &identity, &input).await?;

    let claims = revalidate(ctx.store.as_ref(), ctx.sessions.as_ref(), &identity.did).await?;
    let cookie = commit_session(ctx.sessions.as_ref(), &claims, &ctx.cookie)?;

    Ok(ActionData {
        headers: BTreeMap::from([("Set-Cookie".to_string(), cookie)]),
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
#[path = "../tests/lab_pizza_tests.rs"]
mod tests;
