//! Draft derivation and customization of a catalog keyboard.
//!
//! A [`Draft`] is a value copy of a canonical record, owned by the shopper
//! for the duration of a detail view. The shopper picks a size and switch
//! color on the draft; the canonical record is never touched. Every choice
//! triggers a reconciliation pass ([`diff`]) so the draft's non-customizable
//! fields (name, id, price, quantity) track catalog truth, while the
//! shopper-owned fields are never overwritten.
//!
//! Choices are mirrored into the session store so a draft survives a full
//! navigation, and so a draft can be rebuilt when the canonical fetch fails
//! after the shopper already customized (deliberate resilience, not failure
//! masking).

use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use keebcraft_core::{CartLine, Keyboard, KeyboardId, Size, SwitchColor};

use crate::session::{SessionStore, keys};

/// Customization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CustomizeError {
    /// Commit requires both a size and a switch color.
    #[error("customization incomplete: choose a size and a switch color")]
    IncompleteCustomization,

    /// No canonical record and no session scalars to rebuild a draft from.
    #[error("no keyboard to customize")]
    MissingProduct,
}

/// A mutable shopper-owned copy of a catalog record.
///
/// `size` and `switch_color` start unset and become terminal once chosen
/// for the viewing session; the remaining fields mirror the canonical
/// record and are converged by [`diff`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub id: KeyboardId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub size: Option<Size>,
    pub switch_color: Option<SwitchColor>,
}

/// Overwrite the draft's copy of the non-customizable fields from the
/// latest canonical fetch. Never touches `size` or `switch_color`: those
/// are shopper-owned.
pub fn diff(draft: &mut Draft, canonical: &Keyboard) {
    if draft.name != canonical.name {
        draft.name = canonical.name.clone();
    }
    if draft.id != canonical.id {
        draft.id = canonical.id;
    }
    if draft.price != canonical.price {
        draft.price = canonical.price;
    }
    if draft.quantity != canonical.quantity {
        draft.quantity = canonical.quantity;
    }
}

/// One customization session: a draft plus the canonical record it was
/// derived from (absent when rebuilt from session scalars).
#[derive(Debug, Clone)]
pub struct Customization {
    session: SessionStore,
    canonical: Option<Keyboard>,
    draft: Draft,
}

impl Customization {
    /// Derive a draft from a canonical record.
    ///
    /// Pending size/switch choices from the session are resumed when they
    /// belong to the same keyboard; stale scalars from another keyboard are
    /// replaced. No remote calls.
    #[must_use]
    pub fn begin(session: SessionStore, keyboard: &Keyboard) -> Self {
        let resumed = read_id(&session).is_some_and(|id| id == keyboard.id);

        let draft = Draft {
            id: keyboard.id,
            name: keyboard.name.clone(),
            price: keyboard.price,
            quantity: keyboard.quantity,
            size: if resumed {
                read_scalar(&session, keys::SIZE)
            } else {
                None
            },
            switch_color: if resumed {
                read_scalar(&session, keys::SWITCH_COLOR)
            } else {
                None
            },
        };

        let customization = Self {
            session,
            canonical: Some(keyboard.clone()),
            draft,
        };
        customization.persist();
        customization
    }

    /// Rebuild a draft purely from session scalars.
    ///
    /// Used when the canonical record cannot be loaded, so choices made
    /// before a transient fetch failure are not lost.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizeError::MissingProduct`] when no draft was ever
    /// persisted.
    pub fn begin_from_session(session: SessionStore) -> Result<Self, CustomizeError> {
        let id = read_id(&session).ok_or(CustomizeError::MissingProduct)?;

        let draft = Draft {
            id,
            name: session.read(keys::KEYBOARD_NAME).unwrap_or_default(),
            price: session
                .read(keys::KEYBOARD_PRICE)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(Decimal::ZERO),
            quantity: session
                .read(keys::KEYBOARD_QUANTITY)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0),
            size: read_scalar(&session, keys::SIZE),
            switch_color: read_scalar(&session, keys::SWITCH_COLOR),
        };

        Ok(Self {
            session,
            canonical: None,
            draft,
        })
    }

    /// The current draft.
    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The canonical record this session was derived from, if it loaded.
    #[must_use]
    pub const fn canonical(&self) -> Option<&Keyboard> {
        self.canonical.as_ref()
    }

    /// Choose a size. Reapplying the current choice is a no-op.
    pub fn apply_size(&mut self, size: Size) {
        if self.draft.size == Some(size) {
            return;
        }
        self.draft.size = Some(size);
        self.reconcile();
    }

    /// Choose a switch color. Reapplying the current choice is a no-op.
    pub fn apply_switch_color(&mut self, color: SwitchColor) {
        if self.draft.switch_color == Some(color) {
            return;
        }
        self.draft.switch_color = Some(color);
        self.reconcile();
    }

    /// Adopt a fresh canonical fetch and reconcile the draft against it.
    pub fn refresh(&mut self, canonical: Keyboard) {
        self.canonical = Some(canonical);
        self.reconcile();
    }

    /// Validate the draft and produce the cart line it commits to.
    ///
    /// Customization always adds a single unit: the line's quantity is 1;
    /// quantity stacking happens in the cart afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CustomizeError::IncompleteCustomization`] when either
    /// choice is still unset.
    pub fn commit(&self) -> Result<CartLine, CustomizeError> {
        let size = self
            .draft
            .size
            .ok_or(CustomizeError::IncompleteCustomization)?;
        let switch_color = self
            .draft
            .switch_color
            .ok_or(CustomizeError::IncompleteCustomization)?;

        Ok(CartLine::new(
            self.draft.id,
            self.draft.name.clone(),
            self.draft.price,
            size,
            switch_color,
        ))
    }

    fn reconcile(&mut self) {
        if let Some(canonical) = &self.canonical {
            diff(&mut self.draft, canonical);
        }
        self.persist();
    }

    fn persist(&self) {
        self.session
            .save(keys::KEYBOARD_ID, self.draft.id.to_string());
        self.session.save(keys::KEYBOARD_NAME, self.draft.name.clone());
        self.session
            .save(keys::KEYBOARD_PRICE, self.draft.price.to_string());
        self.session
            .save(keys::KEYBOARD_QUANTITY, self.draft.quantity.to_string());
        save_scalar(&self.session, keys::SIZE, self.draft.size.as_ref());
        save_scalar(
            &self.session,
            keys::SWITCH_COLOR,
            self.draft.switch_color.as_ref(),
        );
    }
}

fn read_id(session: &SessionStore) -> Option<KeyboardId> {
    session
        .read(keys::KEYBOARD_ID)?
        .parse::<i32>()
        .ok()
        .map(KeyboardId::new)
}

/// Read an enum scalar by its wire spelling (e.g. `"TENKEYLESS"`).
fn read_scalar<T: DeserializeOwned>(session: &SessionStore, key: &str) -> Option<T> {
    let raw = session.read(key)?;
    serde_json::from_value(serde_json::Value::String(raw)).ok()
}

fn save_scalar<T: Serialize>(session: &SessionStore, key: &str, value: Option<&T>) {
    match value.and_then(|v| serde_json::to_value(v).ok()) {
        Some(serde_json::Value::String(raw)) => session.save(key, raw),
        _ => session.remove(key),
    }
}
