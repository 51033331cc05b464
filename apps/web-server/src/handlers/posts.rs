//! Post pages: listings, detail, create and edit.

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::web;
use serde::Deserialize;
use tera::Context;
use uuid::Uuid;

use yatube_core::domain::{Group, NewPost, Post, PostFilter, User};
use yatube_core::error::DomainError;
use yatube_core::forms::{FormErrors, PostForm, ValidImage};
use yatube_core::{Page, Paginator};
use yatube_shared::{AuthorView, GroupView, PostView};

use super::form_data::read_post_form;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::render::View;
use crate::state::AppState;
use crate::urls;

/// `?page=` as sent by the browser. Kept as a string so garbage is not a 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub(crate) fn author_view(user: &User) -> AuthorView {
    AuthorView {
        id: user.id,
        username: user.username.clone(),
    }
}

pub(crate) fn group_view(group: &Group) -> GroupView {
    GroupView {
        id: group.id,
        title: group.title.clone(),
        slug: group.slug.clone(),
        description: group.description.clone(),
    }
}

/// Attach authors, groups and image URLs to posts, keeping their order.
async fn hydrate(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostView>> {
    let mut authors: HashMap<Uuid, AuthorView> = HashMap::new();
    let mut groups: HashMap<i64, Option<GroupView>> = HashMap::new();
    let mut views = Vec::with_capacity(posts.len());

    for post in posts {
        if !authors.contains_key(&post.author_id) {
            let author = state
                .users
                .find_by_id(post.author_id)
                .await?
                .ok_or_else(|| AppError::Internal(format!("post {} has no author", post.id)))?;
            authors.insert(post.author_id, author_view(&author));
        }

        let group = match post.group_id {
            None => None,
            Some(group_id) => {
                if !groups.contains_key(&group_id) {
                    let found = state.groups.find_by_id(group_id).await?;
                    groups.insert(group_id, found.as_ref().map(group_view));
                }
                groups.get(&group_id).cloned().flatten()
            }
        };

        views.push(PostView {
            id: post.id,
            author: authors[&post.author_id].clone(),
            group,
            image_url: post.image.as_deref().map(|name| state.images.url(name)),
            text: post.text,
            pub_date: post.pub_date,
        });
    }

    Ok(views)
}

async fn hydrate_one(state: &AppState, post: Post) -> AppResult<PostView> {
    hydrate(state, vec![post])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("post vanished while rendering".to_string()))
}

/// One page of posts matching `filter`, newest first.
async fn paginated_posts(
    state: &AppState,
    filter: PostFilter,
    page: Option<&str>,
) -> AppResult<Page<PostView>> {
    let count = state.posts.count(filter).await?;
    let window = Paginator::default().window(count, page);
    let posts = state.posts.list(filter, window.offset, window.limit).await?;
    Ok(Page::from_window(window, hydrate(state, posts).await?))
}

async fn find_post(state: &AppState, post_id: i64) -> AppResult<Post> {
    Ok(state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?)
}

/// GET / - every post.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<View> {
    let page_obj = paginated_posts(&state, PostFilter::All, query.page.as_deref()).await?;

    let mut context = Context::new();
    context.insert("page_obj", &page_obj);
    Ok(View::page("posts/index.html", context))
}

/// GET /group/{slug}/ - posts filed under one group.
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<View> {
    let slug = path.into_inner();
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("Group", &slug))?;

    let page_obj =
        paginated_posts(&state, PostFilter::Group(group.id), query.page.as_deref()).await?;

    let mut context = Context::new();
    context.insert("group", &group_view(&group));
    context.insert("page_obj", &page_obj);
    Ok(View::page("posts/group_list.html", context))
}

/// GET /profile/{username}/ - posts by one author.
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<View> {
    let username = path.into_inner();
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("User", &username))?;

    let page_obj =
        paginated_posts(&state, PostFilter::Author(author.id), query.page.as_deref()).await?;

    let mut context = Context::new();
    context.insert("author", &author_view(&author));
    context.insert("post_count", &page_obj.count);
    context.insert("page_obj", &page_obj);
    Ok(View::page("posts/profile.html", context))
}

/// GET /posts/{post_id}/ - one post.
pub async fn post_detail(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<View> {
    let post = find_post(&state, path.into_inner()).await?;
    let post_count = state.posts.count(PostFilter::Author(post.author_id)).await?;

    let mut context = Context::new();
    context.insert("post", &hydrate_one(&state, post).await?);
    context.insert("post_count", &post_count);
    Ok(View::page("posts/post_detail.html", context))
}

fn form_page(form: &PostForm, errors: &FormErrors, groups: &[Group]) -> Context {
    let mut context = Context::new();
    context.insert("form", &form.context(errors, groups));
    context.insert("is_edit", &false);
    context
}

async fn edit_page(
    state: &AppState,
    post: Post,
    form: &PostForm,
    errors: &FormErrors,
    groups: &[Group],
) -> AppResult<View> {
    let mut context = form_page(form, errors, groups);
    context.insert("is_edit", &true);
    context.insert("post_id", &post.id);
    context.insert("post", &hydrate_one(state, post).await?);
    Ok(View::page("posts/post_create.html", context))
}

async fn store_image(state: &AppState, image: Option<&ValidImage>) -> AppResult<Option<String>> {
    match image {
        None => Ok(None),
        Some(image) => {
            let name = state.images.save(image.extension, &image.bytes).await?;
            tracing::debug!(%name, content_type = image.content_type, "Image stored");
            Ok(Some(name))
        }
    }
}

/// Best-effort removal of a file no post refers to.
async fn discard_image(state: &AppState, name: &str) {
    if let Err(e) = state.images.remove(name).await {
        tracing::warn!(%name, error = %e, "Failed to remove unused image");
    }
}

/// GET /create/ - blank post form.
pub async fn post_create_form(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<View> {
    let groups = state.groups.list_all().await?;
    let context = form_page(&PostForm::default(), &FormErrors::default(), &groups);
    Ok(View::page("posts/post_create.html", context))
}

/// POST /create/ - multipart submission of the post form.
pub async fn post_create(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<View> {
    let form = read_post_form(payload).await?;
    create_post(&state, &identity, form).await
}

/// Validate and persist a new post authored by `identity`.
pub async fn create_post(state: &AppState, identity: &Identity, form: PostForm) -> AppResult<View> {
    let groups = state.groups.list_all().await?;

    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Post form rejected");
            let context = form_page(&form, &errors, &groups);
            return Ok(View::page("posts/post_create.html", context));
        }
    };

    let image = store_image(state, cleaned.image.as_ref()).await?;
    let created = state
        .posts
        .create(NewPost {
            text: cleaned.text,
            author_id: identity.user_id,
            group_id: cleaned.group_id,
            image: image.clone(),
        })
        .await;
    let post = match created {
        Ok(post) => post,
        Err(e) => {
            if let Some(name) = image {
                discard_image(state, &name).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(post_id = post.id, author = %identity.username, "Post created");
    Ok(View::redirect(urls::profile(&identity.username)))
}

/// Load a post for editing. Anyone but the author is sent to the detail page.
pub async fn editable_post(
    state: &AppState,
    identity: &Identity,
    post_id: i64,
) -> AppResult<Result<Post, View>> {
    let post = find_post(state, post_id).await?;
    if post.author_id != identity.user_id {
        tracing::debug!(post_id, user = %identity.username, "Edit refused, not the author");
        return Ok(Err(View::redirect(urls::post_detail(post_id))));
    }
    Ok(Ok(post))
}

/// GET /posts/{post_id}/edit/ - form bound to the existing post.
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<View> {
    let post = match editable_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(redirect) => return Ok(redirect),
    };

    let groups = state.groups.list_all().await?;
    let form = PostForm::from_post(&post);
    edit_page(&state, post, &form, &FormErrors::default(), &groups).await
}

/// POST /posts/{post_id}/edit/ - multipart submission of the edit form.
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    payload: Multipart,
) -> AppResult<View> {
    let post = match editable_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(redirect) => return Ok(redirect),
    };

    let form = read_post_form(payload).await?;
    update_post(&state, post, form).await
}

/// Validate `form` and write it over `post`. Author and date never change.
pub async fn update_post(state: &AppState, mut post: Post, form: PostForm) -> AppResult<View> {
    let groups = state.groups.list_all().await?;

    let cleaned = match form.clean(&groups) {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            tracing::debug!(post_id = post.id, "Post edit rejected");
            return edit_page(state, post, &form, &errors, &groups).await;
        }
    };

    let previous_image = post.image.clone();
    let uploaded = store_image(state, cleaned.image.as_ref()).await?;
    if let Some(name) = &uploaded {
        post.image = Some(name.clone());
    } else if cleaned.image_clear {
        post.image = None;
    }
    post.text = cleaned.text;
    post.group_id = cleaned.group_id;

    let post = match state.posts.update(post).await {
        Ok(post) => post,
        Err(e) => {
            if let Some(name) = uploaded {
                discard_image(state, &name).await;
            }
            return Err(e.into());
        }
    };

    if let Some(old) = previous_image.filter(|old| post.image.as_ref() != Some(old)) {
        discard_image(state, &old).await;
    }

    tracing::info!(post_id = post.id, "Post updated");
    Ok(View::redirect(urls::post_detail(post.id)))
}
