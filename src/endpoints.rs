//! Paths of the ANCINE statistics API, relative to the base URL.

/// Market share of national vs. foreign titles.
pub const MARKET_SHARE: &str = "/estatisticas/market_share";
/// Distributor ranking by audience and box office.
pub const RANKING_DISTRIBUIDORAS: &str = "/estatisticas/ranking_distribuidoras";
/// Screen count per state.
pub const SALAS_POR_UF: &str = "/estatisticas/salas_por_uf";
/// Yearly box office.
pub const BILHETERIA_ANUAL: &str = "/estatisticas/bilheteria_anual";
/// Performance of Brazilian titles by genre.
pub const DESEMPENHO_GENERO_BR: &str = "/estatisticas/desempenho_genero_br";

/// Production statistics.
pub const PRODUCAO_ESTATISTICAS: &str = "/producao/estatisticas";
/// Registered works.
pub const PRODUCAO_OBRAS: &str = "/producao/obras";
/// International co-productions.
pub const PRODUCAO_COPRODUCOES: &str = "/producao/coproducoes";
/// Co-production statistics.
pub const PRODUCAO_COPRODUCOES_ESTATISTICAS: &str = "/producao/coproducoes/estatisticas";

/// Release search.
pub const LANCAMENTOS_PESQUISA: &str = "/lancamentos/pesquisa";
/// Release statistics.
pub const LANCAMENTOS_ESTATISTICAS: &str = "/lancamentos/estatisticas";
/// Most recent releases.
pub const LANCAMENTOS_RECENTES: &str = "/lancamentos/recentes";

/// Screen search.
pub const PESQUISA_SALAS: &str = "/pesquisa-salas";

/// Raw works table.
pub const OBRAS: &str = "/data/obras";
/// Raw releases table.
pub const LANCAMENTOS: &str = "/data/lancamentos";
/// Raw cinema complexes table.
pub const COMPLEXOS: &str = "/data/complexos";
/// Raw distributors table.
pub const DISTRIBUIDORAS: &str = "/data/distribuidoras";

/// Returns the path of a raw data table (`/data/{table_name}`).
///
/// ```rust
/// use ancine_query::endpoints;
///
/// assert_eq!(endpoints::data_table("complexos"), endpoints::COMPLEXOS);
/// ```
pub fn data_table(table_name: &str) -> String {
    format!("/data/{}", table_name.trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_table() {
        assert_eq!(data_table("obras"), OBRAS);
        assert_eq!(data_table("/lancamentos/"), LANCAMENTOS);
    }
}
