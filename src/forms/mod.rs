pub mod import_export;
