use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use futures::future::join_all;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::client::{ClientResult, OptionSource, ResourceApi};
use crate::forms::cache::RecordCache;
use crate::forms::field::{coerce, FieldError};
use crate::forms::Navigator;
use crate::resource::{EntitySchema, Resource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Loading,
    Ready,
    /// The record could not be fetched; the form is not rendered.
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsState {
    Loading,
    Loaded(Vec<SelectOption>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("form is not ready")]
    NotReady,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("some fields are invalid")]
    Invalid,
    #[error("payload could not be built: {0}")]
    Payload(String),
}

#[derive(Debug)]
pub enum SubmitOutcome<E> {
    /// Saved; the page has already navigated to the collection view.
    Saved(E),
    Blocked(SubmitBlocked),
    /// The request failed; values are kept for a retry.
    Failed(String),
}

/// Validated request waiting to be sent. Produced by [`FormPage::prepare_submit`].
#[derive(Debug)]
pub enum PendingSubmit<E: Resource> {
    Create(E::New),
    Update { id: String, changes: E::Changes },
}

impl<E: Resource> PendingSubmit<E> {
    pub async fn send(&self, api: &impl ResourceApi<E>) -> ClientResult<E> {
        match self {
            PendingSubmit::Create(new) => api.create(new).await,
            PendingSubmit::Update { id, changes } => api.update_by_id(id, changes).await,
        }
    }
}

#[derive(Debug)]
pub struct FormPage<E> {
    mode: FormMode,
    status: FormStatus,
    values: BTreeMap<&'static str, String>,
    dirty: BTreeSet<&'static str>,
    field_errors: BTreeMap<&'static str, FieldError>,
    page_error: Option<String>,
    submitting: bool,
    options: BTreeMap<&'static str, OptionsState>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Resource> FormPage<E> {
    pub fn create() -> Self {
        Self::with_mode(FormMode::Create, FormStatus::Ready)
    }

    /// Starts in [`FormStatus::Loading`]; call [`FormPage::load`] to fetch the record.
    pub fn edit(id: impl Into<String>) -> Self {
        Self::with_mode(FormMode::Edit { id: id.into() }, FormStatus::Loading)
    }

    fn with_mode(mode: FormMode, status: FormStatus) -> Self {
        Self {
            mode,
            status,
            values: Self::blank_values(),
            dirty: BTreeSet::new(),
            field_errors: BTreeMap::new(),
            page_error: None,
            submitting: false,
            options: BTreeMap::new(),
            _entity: PhantomData,
        }
    }

    fn blank_values() -> BTreeMap<&'static str, String> {
        E::SCHEMA.fields.iter().map(|f| (f.name, String::new())).collect()
    }

    pub fn schema(&self) -> EntitySchema {
        E::SCHEMA
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_renderable(&self) -> bool {
        self.status == FormStatus::Ready
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.field_errors.get(field)
    }

    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn options(&self, field: &str) -> Option<&OptionsState> {
        self.options.get(field)
    }

    /// Fetches the record of an edit form. A missing record counts as a failed load.
    pub async fn load(&mut self, api: &impl ResourceApi<E>) {
        let FormMode::Edit { id } = &self.mode else {
            return;
        };
        let id = id.clone();

        self.status = match api.get_by_id(&id).await {
            Ok(Some(record)) => {
                self.fill_from(&record);
                FormStatus::Ready
            }
            Ok(None) => FormStatus::LoadFailed(format!("{} '{}' not found", E::SCHEMA.name, id)),
            Err(err) => FormStatus::LoadFailed(err.to_string()),
        };
    }

    fn fill_from(&mut self, record: &E) {
        let record = serde_json::to_value(record).unwrap_or(Value::Null);
        for field in E::SCHEMA.fields {
            self.values.insert(field.name, EntitySchema::field_text(&record, field.name));
        }
        self.dirty.clear();
        self.field_errors.clear();
    }

    /// Loads the selectable ids of every foreign-key field. Labels are the ids themselves.
    pub async fn load_options(&mut self, source: &impl OptionSource) {
        let references: Vec<_> = E::SCHEMA
            .references()
            .filter_map(|f| f.reference().map(|collection| (f.name, collection)))
            .collect();

        for (field, _) in &references {
            self.options.insert(*field, OptionsState::Loading);
        }

        let loaded = join_all(
            references
                .iter()
                .map(|(_, collection)| source.option_ids(collection)),
        )
        .await;

        for ((field, _), result) in references.into_iter().zip(loaded) {
            let state = match result {
                Ok(ids) => OptionsState::Loaded(
                    ids.into_iter()
                        .map(|id| SelectOption { label: id.clone(), value: id })
                        .collect(),
                ),
                Err(err) => OptionsState::Failed(err.to_string()),
            };
            self.options.insert(field, state);
        }
    }

    /// Sets a field and re-validates it. Returns `false` for fields the entity does not have.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> bool {
        let Some(spec) = E::SCHEMA.field(field) else {
            return false;
        };
        let value = value.into();

        match coerce(spec, &value) {
            Ok(_) => self.field_errors.remove(spec.name),
            Err(err) => self.field_errors.insert(spec.name, err),
        };
        self.values.insert(spec.name, value);
        self.dirty.insert(spec.name);
        true
    }

    /// Submit control state: disabled while loading, in flight or invalid.
    pub fn can_submit(&self) -> bool {
        self.is_renderable() && !self.submitting && self.coerced(false).is_ok()
    }

    pub fn validate(&mut self) -> bool {
        match self.coerced(false) {
            Ok(_) => {
                self.field_errors.clear();
                true
            }
            Err(errors) => {
                self.field_errors = errors;
                false
            }
        }
    }

    fn coerced(
        &self,
        dirty_only: bool,
    ) -> Result<Map<String, Value>, BTreeMap<&'static str, FieldError>> {
        let mut payload = Map::new();
        let mut errors = BTreeMap::new();

        for spec in E::SCHEMA.fields {
            let raw = self.values.get(spec.name).map(String::as_str).unwrap_or_default();
            match coerce(spec, raw) {
                Ok(Some(value)) if !dirty_only || self.dirty.contains(spec.name) => {
                    payload.insert(spec.name.to_owned(), value);
                }
                // A cleared optional field in an edit form nulls the stored value.
                Ok(None) if dirty_only && self.dirty.contains(spec.name) => {
                    payload.insert(spec.name.to_owned(), Value::Null);
                }
                Ok(_) => {}
                Err(err) => {
                    errors.insert(spec.name, err);
                }
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }

    /// Validates and builds the request, then marks the form as in flight. Nothing is sent when
    /// this returns an error.
    pub fn prepare_submit(&mut self) -> Result<PendingSubmit<E>, SubmitBlocked> {
        if !self.is_renderable() {
            return Err(SubmitBlocked::NotReady);
        }
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }
        if !self.validate() {
            return Err(SubmitBlocked::Invalid);
        }

        let pending = match &self.mode {
            FormMode::Create => self.payload().map(PendingSubmit::Create),
            FormMode::Edit { id } => self.payload().map(|changes| PendingSubmit::Update {
                id: id.clone(),
                changes,
            }),
        };

        match pending {
            Ok(pending) => {
                self.submitting = true;
                self.page_error = None;
                Ok(pending)
            }
            Err(err) => {
                self.page_error = Some(err.to_string());
                Err(SubmitBlocked::Payload(err.to_string()))
            }
        }
    }

    // Edit forms send only what the user touched.
    fn payload<P: serde::de::DeserializeOwned>(&self) -> Result<P, serde_json::Error> {
        let dirty_only = matches!(self.mode, FormMode::Edit { .. });
        let map = self.coerced(dirty_only).unwrap_or_default();
        serde_json::from_value(Value::Object(map))
    }

    pub fn complete_submit(
        &mut self,
        result: ClientResult<E>,
        cache: &mut RecordCache<E>,
        navigator: &mut impl Navigator,
    ) -> SubmitOutcome<E> {
        self.submitting = false;

        match result {
            Ok(record) => {
                match self.mode {
                    FormMode::Create => {
                        self.values = Self::blank_values();
                        self.dirty.clear();
                        self.field_errors.clear();
                    }
                    FormMode::Edit { .. } => self.fill_from(&record),
                }
                self.page_error = None;
                cache.put(record.clone());
                navigator.navigate(&E::SCHEMA.collection_route());
                SubmitOutcome::Saved(record)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(entity = E::SCHEMA.name, error = %message, "Submit failed");
                self.page_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &impl ResourceApi<E>,
        cache: &mut RecordCache<E>,
        navigator: &mut impl Navigator,
    ) -> SubmitOutcome<E> {
        let pending = match self.prepare_submit() {
            Ok(pending) => pending,
            Err(blocked) => return SubmitOutcome::Blocked(blocked),
        };
        let result = pending.send(api).await;
        self.complete_submit(result, cache, navigator)
    }
}
