//! Blogs API handlers.
//!
//! ```text
//! GET    /api/blogs
//! POST   /api/blogs        (bearer token required)
//! PUT    /api/blogs/{id}
//! DELETE /api/blogs/{id}   (bearer token required, owner only)
//! ```
//!
//! Creation and deletion keep the owner's `blogs` set in lockstep with the
//! blog collection through two single-document writes; the pair is not
//! atomic, matching the store's per-document guarantees.

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Blog, BlogId, Error, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Owner projection attached to blog responses.
///
/// Deliberately limited to public fields; the password hash never leaves the
/// domain.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: String,
    pub username: String,
    pub name: String,
}

impl OwnerSummary {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            name: user.name().to_owned(),
        }
    }
}

/// Blog representation returned by every blog route.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerSummary>,
}

impl BlogResponse {
    fn new(blog: &Blog, owner: Option<&User>) -> Self {
        Self {
            id: blog.id().to_string(),
            title: blog.title().to_owned(),
            author: blog.author().to_owned(),
            url: blog.url().to_owned(),
            likes: blog.likes(),
            user: owner.map(OwnerSummary::from_user),
        }
    }
}

/// Creation request body for `POST /api/blogs`.
///
/// `title` and `url` are required; `likes` defaults to zero.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
}

/// Update request body for `PUT /api/blogs/{id}`.
///
/// Absent fields keep their stored values, mirroring a partial document
/// update.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
}

fn map_user_persistence_error(error: crate::domain::ports::UserPersistenceError) -> Error {
    Error::internal(error.to_string())
}

fn map_blog_persistence_error(error: crate::domain::ports::BlogPersistenceError) -> Error {
    Error::internal(error.to_string())
}

/// Ids arrive as opaque path segments; anything that is not a stored id
/// format is an unhandled fault, not a client error.
fn parse_blog_id(raw: &str) -> Result<BlogId, Error> {
    BlogId::new(raw).map_err(|error| Error::internal(error.to_string()))
}

/// List every blog with its owner's public projection attached.
#[utoipa::path(
    get,
    path = "/api/blogs",
    responses(
        (status = 200, description = "All blogs in insertion order", body = [BlogResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "listBlogs",
    security([])
)]
#[get("/blogs")]
pub async fn list_blogs(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<BlogResponse>>> {
    let blogs = state
        .blogs
        .find_all()
        .await
        .map_err(map_blog_persistence_error)?;
    let owners: HashMap<UserId, User> = state
        .users
        .find_all()
        .await
        .map_err(map_user_persistence_error)?
        .into_iter()
        .map(|user| (*user.id(), user))
        .collect();

    let body = blogs
        .iter()
        .map(|blog| {
            let owner = blog.user().and_then(|id| owners.get(id));
            BlogResponse::new(blog, owner)
        })
        .collect();
    Ok(web::Json(body))
}

/// Create a blog owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Title or url missing", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "createBlog"
)]
#[post("/blogs")]
pub async fn create_blog(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateBlogRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let blog = Blog::new(
        BlogId::random(),
        payload.title.unwrap_or_default(),
        payload.author.unwrap_or_default(),
        payload.url.unwrap_or_default(),
        payload.likes.unwrap_or(0),
        Some(*user.user().id()),
    )
    .map_err(|_| Error::invalid_request("title or url missing"))?;

    state
        .blogs
        .insert(&blog)
        .await
        .map_err(map_blog_persistence_error)?;

    // Second write of the lockstep pair; not atomic with the insert above.
    let mut owner = user.into_inner();
    owner.grant_blog(*blog.id());
    state
        .users
        .update(&owner)
        .await
        .map_err(map_user_persistence_error)?;

    Ok(HttpResponse::Created().json(BlogResponse::new(&blog, Some(&owner))))
}

/// Update a blog's content fields.
///
/// No ownership check applies here, unlike delete. The id and owner are
/// fixed: an update can never reassign a blog to another user.
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated blog", body = BlogResponse),
        (status = 400, description = "Update blanks a required field", body = Error),
        (status = 404, description = "No blog with this id"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    params(
        ("id" = String, Path, description = "Blog identifier")
    ),
    tags = ["blogs"],
    operation_id = "updateBlog",
    security([])
)]
#[put("/blogs/{id}")]
pub async fn update_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateBlogRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_blog_id(&path)?;
    let Some(existing) = state
        .blogs
        .find_by_id(&id)
        .await
        .map_err(map_blog_persistence_error)?
    else {
        return Ok(HttpResponse::NotFound().finish());
    };

    let payload = payload.into_inner();
    let updated = existing
        .clone()
        .with_fields(
            payload.title.unwrap_or_else(|| existing.title().to_owned()),
            payload
                .author
                .unwrap_or_else(|| existing.author().to_owned()),
            payload.url.unwrap_or_else(|| existing.url().to_owned()),
            payload.likes.unwrap_or(existing.likes()),
        )
        .map_err(|error| Error::invalid_request(error.to_string()))?;

    let Some(stored) = state
        .blogs
        .update(&updated)
        .await
        .map_err(map_blog_persistence_error)?
    else {
        return Ok(HttpResponse::NotFound().finish());
    };

    let owner = match stored.user() {
        Some(owner_id) => state
            .users
            .find_by_id(owner_id)
            .await
            .map_err(map_user_persistence_error)?,
        None => None,
    };
    Ok(HttpResponse::Ok().json(BlogResponse::new(&stored, owner.as_ref())))
}

/// Delete a blog; only its owner may do so.
///
/// The existence check runs before the ownership check so a missing blog
/// never reveals who owns what.
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Authenticated user is not the owner", body = Error),
        (status = 404, description = "No blog with this id"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    params(
        ("id" = String, Path, description = "Blog identifier")
    ),
    tags = ["blogs"],
    operation_id = "deleteBlog"
)]
#[delete("/blogs/{id}")]
pub async fn delete_blog(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_blog_id(&path)?;
    let Some(blog) = state
        .blogs
        .find_by_id(&id)
        .await
        .map_err(map_blog_persistence_error)?
    else {
        return Ok(HttpResponse::NotFound().finish());
    };

    if blog.user() != Some(user.user().id()) {
        return Err(Error::forbidden("only the creator can delete a blog"));
    }

    state
        .blogs
        .delete_by_id(&id)
        .await
        .map_err(map_blog_persistence_error)?;

    // Second write of the lockstep pair; a crash here leaves a dangling id
    // in the owner's set, which readers tolerate.
    let mut owner = user.into_inner();
    owner.revoke_blog(&id);
    state
        .users
        .update(&owner)
        .await
        .map_err(map_user_persistence_error)?;

    Ok(HttpResponse::NoContent().finish())
}
