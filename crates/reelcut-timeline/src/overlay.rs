//! Image overlays composited above the base video.

use reelcut_core::{EntityDefaults, Position, ReelcutError, Result, Size, TimeSpan};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{clamp_unit, merge_span, EntityKind, TimedEntity};
use crate::store::{Collection, EntityStore};

/// Visual style of an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Opacity in `[0, 1]`
    pub opacity: f64,
    /// CSS-like border description, e.g. `2px solid white` or `none`
    pub border: String,
    pub animation: Option<String>,
}

/// A time-ranged image layer at a position on the frame.
///
/// There is no z-order field: later-added overlays paint over earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOverlay {
    pub id: Uuid,
    /// Decoded image asset (data or object URL)
    pub asset_url: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Center of the image, percent of frame
    pub position: Position,
    /// Size in pixels
    pub size: Size,
    pub style: OverlayStyle,
}

impl ImageOverlay {
    pub fn new(asset_url: impl Into<String>, span: TimeSpan) -> Self {
        Self::with_defaults(asset_url, span, &EntityDefaults::default())
    }

    /// New overlay styled from the editor's configured defaults.
    pub fn with_defaults(
        asset_url: impl Into<String>,
        span: TimeSpan,
        defaults: &EntityDefaults,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_url: asset_url.into(),
            start_time: span.start,
            end_time: span.end,
            position: defaults.overlay_position,
            size: defaults.overlay_size,
            style: OverlayStyle {
                opacity: defaults.overlay_opacity,
                border: defaults.overlay_border.clone(),
                animation: None,
            },
        }
    }
}

/// Partial update for an [`ImageOverlay`].
#[derive(Debug, Clone, Default)]
pub struct OverlayPatch {
    pub asset_url: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub position: Option<Position>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub opacity: Option<f64>,
    pub border: Option<String>,
    /// `Some(None)` clears the animation.
    pub animation: Option<Option<String>>,
}

impl TimedEntity for ImageOverlay {
    type Patch = OverlayPatch;

    const KIND: EntityKind = EntityKind::Overlay;

    fn id(&self) -> Uuid {
        self.id
    }

    fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.end_time)
    }

    fn set_span(&mut self, span: TimeSpan) {
        self.start_time = span.start;
        self.end_time = span.end;
    }

    fn apply_patch(&mut self, patch: &OverlayPatch) -> Result<TimeSpan> {
        if let Some(url) = &patch.asset_url {
            self.asset_url = url.clone();
        }
        if let Some(position) = patch.position {
            self.position = position.clamped();
        }
        if let Some(width) = patch.width {
            self.size.width = width;
        }
        if let Some(height) = patch.height {
            self.size.height = height;
        }
        if let Some(opacity) = patch.opacity {
            self.style.opacity = clamp_unit("opacity", opacity)?;
        }
        if let Some(border) = &patch.border {
            self.style.border = border.clone();
        }
        if let Some(animation) = &patch.animation {
            self.style.animation = animation.clone();
        }
        check_size(self.size)?;
        Ok(merge_span(self.span(), patch.start_time, patch.end_time))
    }

    fn normalize(&mut self) -> Result<()> {
        self.position = self.position.clamped();
        self.style.opacity = clamp_unit("opacity", self.style.opacity)?;
        check_size(self.size)
    }

    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.overlays
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.overlays
    }
}

fn check_size(size: Size) -> Result<()> {
    if size.is_valid() {
        Ok(())
    } else {
        Err(ReelcutError::InvalidParameter(format!(
            "overlay size {}x{} must be non-negative",
            size.width, size.height
        )))
    }
}
