use crate::domain::listing::Listing;
use crate::domain::progress::ListingProgress;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook};

/// One line of the completion report.
#[derive(Debug, Clone)]
pub struct CompletionReportRow {
    pub reference: String,
    pub title: String,
    pub city: String,
    pub mandatory_done: usize,
    pub mandatory_total: usize,
    pub nth_done: usize,
    pub nth_total: usize,
    pub overall_percentage: u8,
    pub can_publish: bool,
    pub published: bool,
    pub current_step: String,
}

impl CompletionReportRow {
    pub fn new(listing: &Listing, progress: &ListingProgress) -> Self {
        let completion = &progress.completion;
        Self {
            reference: listing.reference.clone().unwrap_or_default(),
            title: listing.display_name(),
            city: listing.city.clone().unwrap_or_default(),
            mandatory_done: completion.mandatory.completed_count,
            mandatory_total: completion.mandatory.total,
            nth_done: completion.nth.completed_count,
            nth_total: completion.nth.total,
            overall_percentage: completion.overall_percentage,
            can_publish: completion.can_publish_to_portals,
            published: listing.published_to_portals == Some(true),
            current_step: progress.current_step_label(),
        }
    }
}

const HEADERS: [&str; 9] = [
    "Referencia",
    "Inmueble",
    "Ciudad",
    "Obligatorios",
    "Opcionales",
    "Completado %",
    "Publicable",
    "Publicado",
    "Etapa actual",
];

/// Builds the workbook bytes.
pub fn completion_report_xlsx(rows: &[CompletionReportRow]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Fichas")
        .map_err(|e| ServerError::XlsxError(format!("Failed to name sheet: {e}")))?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    let yes_no = |b: bool| if b { "Sí" } else { "No" };

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let cells: [(u16, String); 8] = [
            (0, row.reference.clone()),
            (1, row.title.clone()),
            (2, row.city.clone()),
            (3, format!("{}/{}", row.mandatory_done, row.mandatory_total)),
            (4, format!("{}/{}", row.nth_done, row.nth_total)),
            (6, yes_no(row.can_publish).to_string()),
            (7, yes_no(row.published).to_string()),
            (8, row.current_step.clone()),
        ];

        for (col, value) in &cells {
            worksheet
                .write_string(r, *col, value)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write row {r}: {e}")))?;
        }

        worksheet
            .write_number(r, 5, f64::from(row.overall_percentage))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write percentage: {e}")))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

pub fn export_completion_xlsx(rows: &[CompletionReportRow], date: &str) -> ResultResp {
    let buffer = completion_report_xlsx(rows)?;
    xlsx_response(buffer, &format!("fichas_{date}.xlsx"))
}
