pub mod str_formatter;
