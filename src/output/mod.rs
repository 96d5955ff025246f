pub mod formatter;

pub use formatter::{
    format_record_detail, format_records_table, format_score, format_supplier_ranking,
    format_tsv, format_weights, rank_suppliers, should_use_colors, SupplierAverage,
};
