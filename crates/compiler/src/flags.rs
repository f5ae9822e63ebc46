//! Runtime pieces of the generated script. Every piece is a fixed chunk of
//! script source; the code generator collects the pieces a page needs and
//! emits them in flag order.

use super::script::ScriptModel;
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::Serialize;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct RuntimeHelper: u16 {
        const ESCAPE_HTML  = 1 << 0;
        const RENDER_TEXT  = 1 << 1;
        const RENDER_ATTRS = 1 << 2;
        const RENDER_NODE  = 1 << 3;
        const RENDER       = 1 << 4;
        const SET_STATE    = 1 << 5;
        /// `helpers` object with lees/zet, used by translated functions
        const DOM_HELPERS  = 1 << 6;
        /// `handlers` table plus delegated event listeners
        const BIND_EVENTS  = 1 << 7;

        const RENDERING = Self::ESCAPE_HTML.bits()
            | Self::RENDER_TEXT.bits()
            | Self::RENDER_ATTRS.bits()
            | Self::RENDER_NODE.bits()
            | Self::RENDER.bits()
            | Self::SET_STATE.bits();
    }
}

impl RuntimeHelper {
    /// Pieces needed to run `script`. Rendering is always needed.
    pub fn collect(script: &ScriptModel) -> Self {
        let mut helpers = Self::RENDERING;
        if !script.functions.is_empty() {
            helpers |= Self::DOM_HELPERS;
        }
        if !script.event_bindings.is_empty() {
            helpers |= Self::BIND_EVENTS;
        }
        helpers
    }

    /// Name of the function or binding the piece declares.
    pub fn helper_str(&self) -> &'static str {
        use RuntimeHelper as R;
        match *self {
            R::ESCAPE_HTML => "escapeHtml",
            R::RENDER_TEXT => "renderText",
            R::RENDER_ATTRS => "renderAttrs",
            R::RENDER_NODE => "renderNode",
            R::RENDER => "render",
            R::SET_STATE => "setState",
            R::DOM_HELPERS => "helpers",
            R::BIND_EVENTS => "bindEvents",
            _ => panic!("{:?} is not a single runtime helper", self),
        }
    }
}
