//! Plain-text tables for `--format table`.

const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
}

impl TableOptions {
    /// Width limit taken from `COLUMNS`, when set to a positive number.
    #[must_use]
    pub fn from_env() -> Self {
        let max_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|width| *width > 0);
        Self { max_width }
    }
}

/// Render `rows` under `headers`, each column left-aligned and underlined.
///
/// With a width limit, every column is capped at one shared width, never
/// below its header, chosen as the largest cap that fits.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let natural: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count(), MIN_COLUMN_WIDTH])
                .max()
                .unwrap_or(MIN_COLUMN_WIDTH)
        })
        .collect();
    let floors: Vec<usize> = headers
        .iter()
        .map(|header| header.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();
    let widths = column_widths(&natural, &floors, options.max_width);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(headers.iter().copied(), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(SEPARATOR),
    );
    for row in rows {
        let cells = (0..headers.len()).map(|index| row.get(index).map_or("-", String::as_str));
        lines.push(format_line(cells, &widths));
    }
    lines.join("\n")
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", clip(cell, width)))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
        .trim_end()
        .to_string()
}

fn column_widths(natural: &[usize], floors: &[usize], max_width: Option<usize>) -> Vec<usize> {
    let Some(max_width) = max_width else {
        return natural.to_vec();
    };
    let separators = natural.len().saturating_sub(1) * SEPARATOR.len();
    let capped = |cap: usize| -> Vec<usize> {
        natural
            .iter()
            .zip(floors)
            .map(|(natural, floor)| (*natural).min(cap.max(*floor)))
            .collect()
    };
    let fits = |widths: &[usize]| widths.iter().sum::<usize>() + separators <= max_width;

    let (mut low, mut high) = (0, natural.iter().copied().max().unwrap_or(0));
    while low < high {
        let mid = low + (high - low).div_ceil(2);
        if fits(&capped(mid)) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    capped(low)
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
