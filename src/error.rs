use thiserror::Error;

use crate::ui::WidgetId;

#[derive(Error, Debug)]
pub enum GuiError {
    /// A position or size descriptor was built without any axis.
    #[error("{descriptor} descriptor built without any dimension function")]
    MissingDimension { descriptor: &'static str },

    /// A node builder was terminated without a parent to attach to.
    #[error("node builder for {widget} has no owner; call `parent()` before `build()`")]
    MissingOwner { widget: &'static str },

    #[error("{widget} ({id:?}) does not support {capability}")]
    MissingCapability {
        id: WidgetId,
        widget: &'static str,
        capability: &'static str,
    },

    #[error("widget not found: {0:?}")]
    UnknownWidget(WidgetId),

    /// Declaring this layout would make a quantity depend on itself.
    #[error("cyclic layout: {quantity} of {id:?} would depend on itself")]
    CyclicLayout { id: WidgetId, quantity: &'static str },

    #[error("theme config error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

pub type Result<T> = std::result::Result<T, GuiError>;
