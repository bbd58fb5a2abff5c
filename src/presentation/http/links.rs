use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::links::create_link::CreateLink;
use crate::application::use_cases::links::delete_link::DeleteLink;
use crate::application::use_cases::links::list_links::ListLinks;
use crate::application::use_cases::links::reconcile_links::{DesiredLink, ReconcileLinks};
use crate::application::use_cases::links::update_link::{LinkPatch, UpdateLink};
use crate::application::validation::LinkCandidate;
use crate::bootstrap::app_context::AppContext;
use crate::domain::links::link as domain;
use crate::presentation::http::auth::{Bearer, authenticated_user};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct Link {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub label: String,
    pub url: String,
    pub r#type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<domain::ProfileLink> for Link {
    fn from(l: domain::ProfileLink) -> Self {
        Link {
            id: l.id,
            user_id: l.user_id,
            profile_id: l.profile_id,
            label: l.label,
            url: l.url,
            r#type: l.link_type.as_str().to_string(),
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinksResponse {
    pub links: Vec<Link>,
}

/// One entry of the desired list. With `id` it fully replaces the stored
/// link; without, it becomes a new one. Array position is the ordering.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DesiredLinkItem {
    pub id: Option<Uuid>,
    pub label: String,
    pub url: String,
    pub r#type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReconcileLinksRequest {
    pub links: Vec<DesiredLinkItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLinkRequest {
    pub label: String,
    pub url: String,
    pub r#type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLinkRequest {
    pub label: Option<String>,
    pub url: Option<String>,
    pub r#type: Option<String>,
}

// Uses AppContext as router state

#[utoipa::path(get, path = "/api/profiles/{profile_id}/links", tag = "Links",
    params(("profile_id" = Uuid, Path, description = "Profile ID")),
    responses((status = 200, body = LinksResponse), (status = 404, body = ApiError)))]
pub async fn list_links(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<LinksResponse>, ApiError> {
    let user_id = authenticated_user(&ctx.cfg, bearer)?;
    let links = ctx.link_repo();
    let profiles = ctx.profile_repo();
    let uc = ListLinks {
        links: links.as_ref(),
        profiles: profiles.as_ref(),
    };
    let items = uc.execute(user_id, profile_id).await?;
    Ok(Json(LinksResponse {
        links: items.into_iter().map(Link::from).collect(),
    }))
}

#[utoipa::path(put, path = "/api/profiles/{profile_id}/links", tag = "Links",
    request_body = ReconcileLinksRequest,
    params(("profile_id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, body = LinksResponse),
        (status = 404, body = ApiError),
        (status = 422, body = ApiError)
    ))]
pub async fn reconcile_links(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(profile_id): Path<Uuid>,
    Json(req): Json<ReconcileLinksRequest>,
) -> Result<Json<LinksResponse>, ApiError> {
    let user_id = authenticated_user(&ctx.cfg, bearer)?;
    let links = ctx.link_repo();
    let profiles = ctx.profile_repo();
    let uc = ReconcileLinks {
        links: links.as_ref(),
        profiles: profiles.as_ref(),
        max_links: ctx.cfg.max_profile_links,
    };
    let desired = req
        .links
        .into_iter()
        .map(|item| DesiredLink {
            id: item.id,
            label: item.label,
            url: item.url,
            link_type: item.r#type,
        })
        .collect();
    let items = uc.execute(user_id, profile_id, desired).await?;
    Ok(Json(LinksResponse {
        links: items.into_iter().map(Link::from).collect(),
    }))
}

#[utoipa::path(post, path = "/api/profiles/{profile_id}/links", tag = "Links",
    request_body = CreateLinkRequest,
    params(("profile_id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, body = Link),
        (status = 404, body = ApiError),
        (status = 422, body = ApiError)
    ))]
pub async fn create_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(profile_id): Path<Uuid>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<Json<Link>, ApiError> {
    let user_id = authenticated_user(&ctx.cfg, bearer)?;
    let links = ctx.link_repo();
    let profiles = ctx.profile_repo();
    let uc = CreateLink {
        links: links.as_ref(),
        profiles: profiles.as_ref(),
        max_links: ctx.cfg.max_profile_links,
    };
    let candidate = LinkCandidate {
        label: req.label,
        url: req.url,
        link_type: req.r#type,
    };
    let created = uc.execute(user_id, profile_id, candidate).await?;
    Ok(Json(Link::from(created)))
}

#[utoipa::path(patch, path = "/api/links/{link_id}", tag = "Links",
    request_body = UpdateLinkRequest,
    params(("link_id" = Uuid, Path, description = "Link ID")),
    responses(
        (status = 200, body = Link),
        (status = 404, body = ApiError),
        (status = 422, body = ApiError)
    ))]
pub async fn update_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(link_id): Path<Uuid>,
    Json(req): Json<UpdateLinkRequest>,
) -> Result<Json<Link>, ApiError> {
    let user_id = authenticated_user(&ctx.cfg, bearer)?;
    let links = ctx.link_repo();
    let uc = UpdateLink {
        links: links.as_ref(),
    };
    let patch = LinkPatch {
        label: req.label,
        url: req.url,
        link_type: req.r#type,
    };
    let updated = uc.execute(user_id, link_id, patch).await?;
    Ok(Json(Link::from(updated)))
}

#[utoipa::path(delete, path = "/api/links/{link_id}", tag = "Links",
    params(("link_id" = Uuid, Path, description = "Link ID")),
    responses((status = 204), (status = 404, body = ApiError)))]
pub async fn delete_link(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(link_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user_id = authenticated_user(&ctx.cfg, bearer)?;
    let links = ctx.link_repo();
    let uc = DeleteLink {
        links: links.as_ref(),
    };
    uc.execute(user_id, link_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/profiles/:profile_id/links",
            get(list_links).put(reconcile_links).post(create_link),
        )
        .route("/links/:link_id", patch(update_link).delete(delete_link))
        .with_state(ctx)
}
