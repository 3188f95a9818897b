//! Allow-list of the lego table's queryable columns.
//!
//! `searchBy` and `category` arrive as raw strings from the query string;
//! they are parsed into this enum before touching SQL. Identifiers are
//! emitted pre-quoted (`set` is a reserved word in PostgreSQL), so no
//! caller-supplied text is ever interpolated into a statement.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Code,
    Lego,
    Set,
    Task,
    Pedido,
    Cant,
    Completo,
    Reemplazado,
}

impl Column {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "code" => Some(Self::Code),
            "lego" => Some(Self::Lego),
            "set" => Some(Self::Set),
            "task" => Some(Self::Task),
            "pedido" => Some(Self::Pedido),
            "cant" => Some(Self::Cant),
            "completo" => Some(Self::Completo),
            "reemplazado" => Some(Self::Reemplazado),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Lego => "lego",
            Self::Set => "set",
            Self::Task => "task",
            Self::Pedido => "pedido",
            Self::Cant => "cant",
            Self::Completo => "completo",
            Self::Reemplazado => "reemplazado",
        }
    }

    /// Double-quoted identifier, safe to splice into a statement.
    pub fn quoted(&self) -> &'static str {
        match self {
            Self::Code => "\"code\"",
            Self::Lego => "\"lego\"",
            Self::Set => "\"set\"",
            Self::Task => "\"task\"",
            Self::Pedido => "\"pedido\"",
            Self::Cant => "\"cant\"",
            Self::Completo => "\"completo\"",
            Self::Reemplazado => "\"reemplazado\"",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
