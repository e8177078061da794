//! Pane geometry for the two-pane layout.
//!
//! Pure arithmetic over terminal size. The render layer converts the returned
//! rectangles into widget areas.

/// Rows reserved above the panes (blank, title, blank).
pub const HEADER_ROWS: u16 = 3;
/// Rows reserved below the panes (help, status, widget error).
pub const FOOTER_ROWS: u16 = 3;
/// Columns of margin on each side of the pane row.
pub const MARGIN_COLS: u16 = 1;
/// Columns between the two panes.
pub const GUTTER_COLS: u16 = 1;
/// Total horizontal padding: both margins plus the gutter.
pub const HORIZONTAL_PADDING: u16 = MARGIN_COLS * 2 + GUTTER_COLS;
/// Below this width the layout is not guaranteed to be usable.
pub const MIN_USABLE_WIDTH: u16 = 20;
/// Below this height the layout is not guaranteed to be usable.
pub const MIN_USABLE_HEIGHT: u16 = 10;
/// Border cells consumed on each axis by a bordered pane.
pub const BORDER_CELLS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl PaneRect {
    /// Size left for content once the border is drawn.
    pub fn inner_size(&self) -> (u16, u16) {
        (
            self.width.saturating_sub(BORDER_CELLS),
            self.height.saturating_sub(BORDER_CELLS),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneGeometry {
    pub total_width: u16,
    pub total_height: u16,
    pub source: PaneRect,
    pub result: PaneRect,
}

impl PaneGeometry {
    pub fn is_usable(&self) -> bool {
        self.total_width >= MIN_USABLE_WIDTH && self.total_height >= MIN_USABLE_HEIGHT
    }
}

/// Split the terminal into source and result panes.
///
/// For any width at or above [`HORIZONTAL_PADDING`],
/// `source.width + result.width + HORIZONTAL_PADDING == width`.
pub fn compute(width: u16, height: u16) -> PaneGeometry {
    let usable_width = width.saturating_sub(HORIZONTAL_PADDING);
    let source_width = usable_width / 2;
    let result_width = usable_width - source_width;
    let pane_height = height.saturating_sub(HEADER_ROWS + FOOTER_ROWS);

    let source = PaneRect {
        x: MARGIN_COLS.min(width),
        y: HEADER_ROWS.min(height),
        width: source_width,
        height: pane_height,
    };
    let result = PaneRect {
        x: (MARGIN_COLS + source_width + GUTTER_COLS).min(width),
        y: HEADER_ROWS.min(height),
        width: result_width,
        height: pane_height,
    };

    PaneGeometry {
        total_width: width,
        total_height: height,
        source,
        result,
    }
}
