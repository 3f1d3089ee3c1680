//! Sales insights data model.
//!
//! The AI provider is instructed to answer with a JSON object carrying six
//! fields. Providers drop fields under load or on thin page content, so
//! decoding goes through [`RawInsights`], a permissive mirror where every
//! field is optional, and [`RawInsights::fill_missing`] substitutes a
//! sentinel before the strict shape is produced. Wrong types (a number where
//! a string belongs, a string where the USP list belongs) are still a
//! validation failure.

use serde::{Deserialize, Serialize};

/// Placeholder for fields the AI did not return.
pub const SENTINEL: &str = "Não disponível";

/// Structured sales insights extracted from a web page.
///
/// Field names match the JSON contract given to the AI provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesInsights {
    /// Company that owns the site.
    pub nome_empresa: String,
    /// Main product or service offered.
    pub principal_servico_produto: String,
    /// Primary target audience.
    pub publico_alvo: String,
    /// Concise value proposition (at most two sentences).
    pub proposta_de_valor: String,
    /// 3-5 unique selling points for the sales team.
    pub pontos_de_venda_usp: Vec<String>,
    /// Executive summary of the site content.
    pub resumo_executivo: String,
}

/// Permissive mirror of [`SalesInsights`] used to decode AI output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInsights {
    pub nome_empresa: Option<String>,
    pub principal_servico_produto: Option<String>,
    pub publico_alvo: Option<String>,
    pub proposta_de_valor: Option<String>,
    pub pontos_de_venda_usp: Option<Vec<String>>,
    pub resumo_executivo: Option<String>,
}

impl RawInsights {
    /// Produce the strict shape, substituting the sentinel for absent fields.
    ///
    /// Pure transformation: partial provider output still yields a complete
    /// record rather than failing the whole analysis.
    pub fn fill_missing(self) -> SalesInsights {
        let fill = |f: Option<String>| f.unwrap_or_else(|| SENTINEL.to_string());

        SalesInsights {
            nome_empresa: fill(self.nome_empresa),
            principal_servico_produto: fill(self.principal_servico_produto),
            publico_alvo: fill(self.publico_alvo),
            proposta_de_valor: fill(self.proposta_de_valor),
            pontos_de_venda_usp: self
                .pontos_de_venda_usp
                .unwrap_or_else(|| vec![SENTINEL.to_string()]),
            resumo_executivo: fill(self.resumo_executivo),
        }
    }
}

impl SalesInsights {
    /// Coerce a raw AI JSON payload into the strict insights shape.
    ///
    /// Missing fields are sentinel-filled; type mismatches fail with
    /// [`crate::Error::Validation`].
    pub fn from_ai_json(value: serde_json::Value) -> Result<Self, crate::Error> {
        let raw: RawInsights = serde_json::from_value(value)
            .map_err(|e| crate::Error::Validation(format!("AI output did not match insights shape: {e}")))?;
        Ok(raw.fill_missing())
    }
}
