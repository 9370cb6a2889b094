// src/common/normalize.rs
//
// Normalização dos valores monetários e datas que chegam do front-end.
// O navegador manda tanto números quanto strings formatadas ("R$ 1.234,56",
// "31/12/2025"), e os dois precisam convergir para o mesmo tipo antes de
// tocar o banco. As duas funções são idempotentes: normalizar um valor já
// normalizado devolve o mesmo resultado.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::ToSchema;

/// Valor monetário como chega do cliente: número JSON ou string formatada.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ValorFlex {
    Numero(f64),
    Texto(String),
}

/// Identificador que o front às vezes manda como número, às vezes como texto
/// (ids customizados de veículo). Vazio, "0" e não-positivos viram ausência.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum IdFlex {
    Numero(i64),
    Texto(String),
}

impl IdFlex {
    pub fn em_texto(&self) -> Option<String> {
        match self {
            IdFlex::Numero(n) if *n > 0 => Some(n.to_string()),
            IdFlex::Numero(_) => None,
            IdFlex::Texto(t) if !t.is_empty() && t != "0" => Some(t.clone()),
            IdFlex::Texto(_) => None,
        }
    }
}

pub fn normalizar_valor(bruto: &ValorFlex) -> Option<f64> {
    match bruto {
        ValorFlex::Numero(n) => Some(*n),
        ValorFlex::Texto(s) => normalizar_valor_texto(s),
    }
}

fn normalizar_valor_texto(bruto: &str) -> Option<f64> {
    let mut s: String = bruto.split_whitespace().collect();
    s = s.replace("R$", "").replace("r$", "");

    // Formato pt-BR: ponto é separador de milhar, vírgula é decimal.
    if s.contains('.') && s.contains(',') {
        s = s.replace('.', "");
        s = s.replace(',', ".");
    } else if s.contains(',') {
        s = s.replace(',', ".");
    }

    s.retain(|c| c.is_ascii_digit() || c == '.' || c == '-');
    s.parse::<f64>().ok()
}

/// Aceita `dd/mm/yyyy`, `yyyy-mm-dd` e datetimes ISO; devolve a data.
pub fn normalizar_data(bruto: &str) -> Option<NaiveDate> {
    let s = bruto.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valor(s: &str) -> Option<f64> {
        normalizar_valor(&ValorFlex::Texto(s.to_string()))
    }

    #[test]
    fn normaliza_valores_formatados() {
        assert_eq!(valor("R$ 1.234,56"), Some(1234.56));
        assert_eq!(valor("1.234,56"), Some(1234.56));
        assert_eq!(valor("59,9"), Some(59.9));
        assert_eq!(valor("450"), Some(450.0));
        assert_eq!(valor("-42,50"), Some(-42.5));
        assert_eq!(valor("abc"), None);
        assert_eq!(valor(""), None);
    }

    #[test]
    fn normalizacao_de_valor_e_idempotente() {
        let primeira = valor("R$ 1.234,56").unwrap();
        let segunda = valor(&primeira.to_string()).unwrap();
        assert_eq!(primeira, segunda);

        assert_eq!(
            normalizar_valor(&ValorFlex::Numero(1234.56)),
            Some(1234.56)
        );
    }

    #[test]
    fn normaliza_datas() {
        let esperada = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(normalizar_data("31/12/2025"), Some(esperada));
        assert_eq!(normalizar_data("2025-12-31"), Some(esperada));
        assert_eq!(normalizar_data("2025-12-31T08:30:00Z"), Some(esperada));
        assert_eq!(normalizar_data("2025-12-31 08:30:00"), Some(esperada));
        assert_eq!(normalizar_data("nunca"), None);
    }

    #[test]
    fn normalizacao_de_data_e_idempotente() {
        let primeira = normalizar_data("31/12/2025").unwrap();
        let segunda = normalizar_data(&primeira.to_string()).unwrap();
        assert_eq!(primeira, segunda);
    }

    #[test]
    fn id_flexivel_descarta_vazios_e_zero() {
        assert_eq!(IdFlex::Numero(7).em_texto(), Some("7".to_string()));
        assert_eq!(IdFlex::Numero(0).em_texto(), None);
        assert_eq!(IdFlex::Texto("abc123".into()).em_texto(), Some("abc123".to_string()));
        assert_eq!(IdFlex::Texto("0".into()).em_texto(), None);
        assert_eq!(IdFlex::Texto("".into()).em_texto(), None);
    }
}
