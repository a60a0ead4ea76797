//! Create, edit and delete screens for resources that carry a form schema.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::resource::Resource;
use crate::domain::types::RecordId;
use crate::dto::form::FormPageData;
use crate::forms::{FieldKind, FormData, FormRenderer, FormSchema, FormSubmission};
use crate::repository::errors::RepositoryError;
use crate::repository::{RecordReader, RecordWriter};
use crate::services::{ServiceError, ServiceResult};

/// Result of a posted form.
#[derive(Debug)]
pub enum FormOutcome {
    /// Toggle, clear or a rejected submit: show the form again.
    Rerender(FormPageData),
    /// The record was stored.
    Saved,
}

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.has_role(SERVICE_ADMIN_ROLE) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

fn form_schema(resource: &Resource) -> ServiceResult<&FormSchema> {
    resource.form.as_ref().ok_or(ServiceError::NotFound)
}

fn page_data(
    resource: &Resource,
    renderer: &FormRenderer,
    id: Option<&RecordId>,
    errors: Vec<String>,
) -> FormPageData {
    let title = renderer
        .schema()
        .title
        .as_ref()
        .map(|title| title.label.clone())
        .unwrap_or_else(|| resource.title.clone());
    let action_url = match id {
        Some(id) => format!("/{}/{id}/edit", resource.slug),
        None => format!("/{}/new", resource.slug),
    };

    FormPageData {
        slug: resource.slug.to_string(),
        title,
        form: renderer.render(),
        action_url,
        record_id: id.map(ToString::to_string),
        cancel_href: format!("/{}", resource.slug),
        errors,
    }
}

/// Required inputs left blank. Passwords may stay blank on edit.
fn missing_required(schema: &FormSchema, data: &FormData, editing: bool) -> Vec<String> {
    schema
        .leaves()
        .into_iter()
        .filter(|field| field.required && field.kind.holds_value())
        .filter(|field| !(editing && field.kind == FieldKind::Password))
        .filter(|field| {
            field
                .name
                .as_deref()
                .and_then(|name| data.get(name))
                .is_none_or(|value| value.trim().is_empty())
        })
        .map(|field| format!("{} is required", field.label))
        .collect()
}

/// Blank password inputs on an edit screen mean "keep the current one".
fn drop_blank_passwords(schema: &FormSchema, data: &mut FormData) {
    for field in schema.leaves() {
        if field.kind != FieldKind::Password {
            continue;
        }
        if let Some(name) = field.name.as_deref() {
            if data.get(name).is_some_and(|value| value.is_empty()) {
                data.remove(name);
            }
        }
    }
}

/// Empty create form seeded from schema defaults.
pub fn load_new_form(user: &AuthenticatedUser, resource: &Resource) -> ServiceResult<FormPageData> {
    ensure_admin(user)?;
    let schema = form_schema(resource)?;
    let renderer = FormRenderer::new(schema.clone());
    Ok(page_data(resource, &renderer, None, Vec::new()))
}

/// Edit form seeded from the stored record.
pub async fn load_edit_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    resource: &Resource,
    id: &str,
) -> ServiceResult<FormPageData>
where
    R: RecordReader + ?Sized,
{
    ensure_admin(user)?;
    let schema = form_schema(resource)?;
    let id = RecordId::new(id)?;

    let record = repo
        .get_record(&user.token, &resource.endpoint, &id)
        .await
        .map_err(|err| {
            log::error!("Failed to load {} {id}: {err}", resource.slug);
            ServiceError::from(err)
        })?;

    let renderer = FormRenderer::new(schema.with_record_defaults(&record));
    Ok(page_data(resource, &renderer, Some(&id), Vec::new()))
}

/// Applies a posted form. `id` is `None` on the create screen.
pub async fn submit_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    resource: &Resource,
    id: Option<&str>,
    pairs: &[(String, String)],
) -> ServiceResult<FormOutcome>
where
    R: RecordWriter + ?Sized,
{
    ensure_admin(user)?;
    let schema = form_schema(resource)?;
    let id = id.map(RecordId::new).transpose()?;

    let mut submission = FormSubmission::from_pairs(schema, pairs);
    let rerender = |submission: FormSubmission, errors: Vec<String>| {
        let renderer = FormRenderer::with_state(schema.clone(), submission.state);
        FormOutcome::Rerender(page_data(resource, &renderer, id.as_ref(), errors))
    };

    let Some(mut data) = submission.apply() else {
        return Ok(rerender(submission, Vec::new()));
    };

    let missing = missing_required(schema, &data, id.is_some());
    if !missing.is_empty() {
        return Ok(rerender(submission, missing));
    }

    let result = match &id {
        Some(id) => {
            drop_blank_passwords(schema, &mut data);
            repo.update_record(&user.token, &resource.endpoint, id, &data)
                .await
        }
        None => {
            repo.create_record(&user.token, &resource.endpoint, &data)
                .await
        }
    };

    match result {
        Ok(_) => Ok(FormOutcome::Saved),
        Err(RepositoryError::Rejected(message)) => Ok(rerender(submission, vec![message])),
        Err(err) => {
            log::error!("Failed to save {}: {err}", resource.slug);
            Err(ServiceError::from(err))
        }
    }
}

pub async fn delete_record<R>(
    repo: &R,
    user: &AuthenticatedUser,
    resource: &Resource,
    id: &str,
) -> ServiceResult<()>
where
    R: RecordWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = RecordId::new(id)?;

    repo.delete_record(&user.token, &resource.endpoint, &id)
        .await
        .map_err(|err| {
            log::error!("Failed to delete {} {id}: {err}", resource.slug);
            ServiceError::from(err)
        })
}
