pub mod check;
pub mod lsp;
