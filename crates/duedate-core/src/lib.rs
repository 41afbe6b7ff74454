pub mod dates;
pub mod extract;
pub mod model;
pub mod period;
pub mod schema;
pub mod text;

pub use dates::{DateError, Urgency, add_days, parse_date};
pub use extract::{ExtractError, TextExtractor};
pub use model::{
    CalculationMethod, CertificationInfo, ComplianceItem, DueDateResult, HistoricalRecord,
    SourceDocument, ValidityClaim,
};
pub use period::{leading_number, period_to_days};
pub use schema::ledger;
pub use text::{normalize_title, parse_certification_info, truncate_text};
