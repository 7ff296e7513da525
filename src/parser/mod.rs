pub mod json_field;
