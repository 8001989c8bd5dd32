//! Create/edit form pages and list pages, written once against the entity schema.

mod cache;
mod field;
mod list;
mod page;

pub use cache::RecordCache;
pub use field::{coerce, FieldError, DATE_FORMAT};
pub use list::{ListPage, ListRow, ListStatus};
pub use page::{FormMode, FormPage, FormStatus, OptionsState, PendingSubmit, SelectOption, SubmitBlocked, SubmitOutcome};

/// Where a page goes after a successful submit.
pub trait Navigator {
    fn navigate(&mut self, route: &str);
}

#[derive(Debug, Default, Clone)]
pub struct History {
    routes: Vec<String>,
}

impl History {
    pub fn current(&self) -> Option<&str> {
        self.routes.last().map(String::as_str)
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }
}

impl Navigator for History {
    fn navigate(&mut self, route: &str) {
        self.routes.push(route.to_owned());
    }
}

#[cfg(test)]
pub(crate) mod testing;
