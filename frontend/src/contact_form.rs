use std::collections::BTreeMap;

use gloo_events::{EventListener, EventListenerOptions};
use log::{debug, info};
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{self, Array};
use web_sys::{Document, FormData, HtmlFormElement, Window};

use crate::config::contact_form::{CONFIRMATION, FORM_ID};
use crate::error::BehaviorError;

/// Field values of one submission. Collected locally, never sent anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub fields: BTreeMap<String, String>,
}

impl ContactSubmission {
    /// Later entries with the same name replace earlier ones.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            fields: entries.into_iter().collect(),
        }
    }

    fn from_form(form: &HtmlFormElement) -> Result<Self, BehaviorError> {
        let data = FormData::new_with_form(form)?;
        let mut entries = Vec::new();
        if let Some(iter) = js_sys::try_iter(&data)? {
            for entry in iter {
                let pair = Array::from(&entry?);
                // File inputs yield non-string values; those are skipped.
                if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                    entries.push((name, value));
                }
            }
        }
        Ok(Self::from_entries(entries))
    }
}

pub struct ContactFormHandler {
    _listener: EventListener,
}

impl ContactFormHandler {
    /// Confirms each submission with a blocking `alert`.
    pub fn attach(document: &Document, window: &Window) -> Option<Self> {
        let window = window.clone();
        Self::attach_with(document, move |_| {
            let _ = window.alert_with_message(CONFIRMATION);
        })
    }

    /// Like [`ContactFormHandler::attach`], with `confirm` shown the collected
    /// fields in place of the alert.
    pub fn attach_with<F>(document: &Document, confirm: F) -> Option<Self>
    where
        F: Fn(&ContactSubmission) + 'static,
    {
        let form = document
            .get_element_by_id(FORM_ID)
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());
        let Some(form) = form else {
            debug!("no #{} form on page", FORM_ID);
            return None;
        };

        let form_for_submit = form.clone();
        let listener = EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let submission = match ContactSubmission::from_form(&form_for_submit) {
                    Ok(submission) => submission,
                    Err(e) => {
                        debug!("could not read contact form: {}", e);
                        ContactSubmission::default()
                    }
                };
                debug!(
                    "contact form collected fields: {:?}",
                    submission.fields.keys().collect::<Vec<_>>()
                );
                confirm(&submission);
                form_for_submit.reset();
            },
        );

        info!("Contact form handler attached");
        Some(Self { _listener: listener })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn collects_named_fields() {
        let submission = ContactSubmission::from_entries(vec![
            pair("name", "Ada"),
            pair("email", "ada@example.com"),
            pair("message", "Hello"),
        ]);
        assert_eq!(submission.fields.len(), 3);
        assert_eq!(submission.fields["email"], "ada@example.com");
    }

    #[test]
    fn duplicate_names_keep_the_last_value() {
        let submission =
            ContactSubmission::from_entries(vec![pair("topic", "sales"), pair("topic", "support")]);
        assert_eq!(submission.fields["topic"], "support");
    }

    #[test]
    fn serializes_as_a_flat_field_map() {
        let submission = ContactSubmission::from_entries(vec![pair("b", "2"), pair("a", "1")]);
        assert_eq!(
            serde_json::to_string(&submission).unwrap(),
            r#"{"fields":{"a":"1","b":"2"}}"#
        );
    }
}
