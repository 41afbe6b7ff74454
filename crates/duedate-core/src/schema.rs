/// Arrow schema and batch builder for the resolution ledger.
pub mod ledger {
    use std::sync::Arc;

    use arrow::array::{
        Array, Date32Array, Date32Builder, Float64Array, Float64Builder, ListArray, ListBuilder,
        StringArray, StringBuilder,
    };
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::error::ArrowError;
    use arrow::record_batch::RecordBatch;
    use chrono::{NaiveDate, TimeDelta};

    use crate::model::{ComplianceItem, DueDateResult};

    /// Schema for resolved compliance items.
    pub fn ledger_schema() -> Schema {
        Schema::new(vec![
            Field::new("title", DataType::Utf8, false),
            Field::new("responsible_email", DataType::Utf8, false),
            Field::new("application_date", DataType::Date32, false),
            Field::new("due_date", DataType::Date32, false),
            Field::new("method", DataType::Utf8, false),
            Field::new("confidence", DataType::Float64, false),
            Field::new("validity_period", DataType::Utf8, true),
            Field::new(
                "source_urls",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                false,
            ),
            Field::new("calculation_notes", DataType::Utf8, false),
            Field::new("warning", DataType::Utf8, true),
        ])
    }

    /// Days since 1970-01-01, the Date32 encoding.
    fn date32(d: NaiveDate) -> i32 {
        (d - NaiveDate::default()).num_days() as i32
    }

    /// Build one ledger batch from resolved items.
    pub fn results_to_batch(
        rows: &[(ComplianceItem, DueDateResult)],
    ) -> Result<RecordBatch, ArrowError> {
        let mut title = StringBuilder::new();
        let mut email = StringBuilder::new();
        let mut application = Date32Builder::new();
        let mut due = Date32Builder::new();
        let mut method = StringBuilder::new();
        let mut confidence = Float64Builder::new();
        let mut validity = StringBuilder::new();
        let mut urls = ListBuilder::new(StringBuilder::new());
        let mut notes = StringBuilder::new();
        let mut warning = StringBuilder::new();

        for (item, result) in rows {
            title.append_value(&item.title);
            email.append_value(&item.responsible_email);
            application.append_value(date32(item.application_date));
            due.append_value(date32(result.due_date));
            method.append_value(result.method.as_str());
            confidence.append_value(result.confidence);
            validity.append_option(result.validity_period.as_deref());
            for url in &result.source_urls {
                urls.values().append_value(url);
            }
            urls.append(true);
            notes.append_value(&result.calculation_notes);
            warning.append_option(result.warning.as_deref());
        }

        RecordBatch::try_new(
            Arc::new(ledger_schema()),
            vec![
                Arc::new(title.finish()),
                Arc::new(email.finish()),
                Arc::new(application.finish()),
                Arc::new(due.finish()),
                Arc::new(method.finish()),
                Arc::new(confidence.finish()),
                Arc::new(validity.finish()),
                Arc::new(urls.finish()),
                Arc::new(notes.finish()),
                Arc::new(warning.finish()),
            ],
        )
    }

    /// Read `(title, due_date, method, confidence)` back out of a ledger batch.
    pub fn summarize_batch(
        batch: &RecordBatch,
    ) -> Result<Vec<(String, NaiveDate, String, f64)>, ArrowError> {
        let col = |name: &str| {
            batch
                .column_by_name(name)
                .ok_or_else(|| ArrowError::SchemaError(format!("missing '{name}' column")))
        };
        let downcast_err =
            |name: &str| ArrowError::CastError(format!("unexpected type for '{name}'"));

        let titles = col("title")?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| downcast_err("title"))?;
        let due = col("due_date")?
            .as_any()
            .downcast_ref::<Date32Array>()
            .ok_or_else(|| downcast_err("due_date"))?;
        let methods = col("method")?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| downcast_err("method"))?;
        let confidence = col("confidence")?
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| downcast_err("confidence"))?;
        // Validate the list column shape even though it is not summarised.
        col("source_urls")?
            .as_any()
            .downcast_ref::<ListArray>()
            .ok_or_else(|| downcast_err("source_urls"))?;

        let mut out = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            if due.is_null(row) {
                continue;
            }
            let date = NaiveDate::default()
                .checked_add_signed(TimeDelta::days(i64::from(due.value(row))))
                .ok_or_else(|| {
                    ArrowError::InvalidArgumentError(format!("due_date out of range at row {row}"))
                })?;
            out.push((
                titles.value(row).to_string(),
                date,
                methods.value(row).to_string(),
                confidence.value(row),
            ));
        }
        Ok(out)
    }
}
