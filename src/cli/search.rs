use super::ui;
use crate::AppContext;
use crate::core::Token;
use crate::core::search::FuzzySearch;
use anyhow::Result;
use comfy_table::Cell;

/// Renders a numbered token list, showing at most `limit` rows. The token
/// whose id is `selected_id` is marked.
pub fn render_token_table(tokens: &[&Token], limit: usize, selected_id: Option<&str>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("ID"),
    ]);

    for (i, token) in tokens.iter().take(limit).enumerate() {
        let symbol = if selected_id == Some(token.id.as_str()) {
            format!("{} (selected)", token.display_symbol())
        } else {
            token.display_symbol()
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(symbol),
            Cell::new(&token.name),
            Cell::new(&token.id),
        ]);
    }

    let shown = tokens.len().min(limit);
    format!(
        "{table}\n{}",
        ui::style_text(
            &format!("Showing {} of {} matches", shown, tokens.len()),
            ui::StyleType::Subtle
        )
    )
}

pub async fn search(ctx: &AppContext, query: &str, limit: Option<usize>) -> Result<String> {
    let pb = ui::new_spinner("Fetching token list...");
    let tokens = ctx.token_list.fetch_tokens().await;
    pb.finish_and_clear();
    let tokens = tokens?;

    let search = FuzzySearch::new(ctx.config.search.threshold);
    let results = search.search(&tokens, query);
    if results.is_empty() {
        return Ok(format!("No tokens match '{query}'"));
    }

    let limit = limit.unwrap_or(ctx.config.search.limit);
    Ok(render_token_table(&results, limit, None))
}

pub async fn run(ctx: &AppContext, query: &str, limit: Option<usize>) -> Result<()> {
    println!("{}", search(ctx, query, limit).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_utils::{MockPriceProvider, sample_tokens, test_context};

    #[tokio::test]
    async fn test_search_lists_best_match_first() {
        let ctx = test_context(MockPriceProvider::new(&[]), sample_tokens());

        let output = search(&ctx, "eth", None).await.unwrap();
        let first_row = output
            .lines()
            .find(|line| line.contains(" 1 "))
            .expect("no numbered row");

        assert!(first_row.contains("ethereum"), "{output}");
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let ctx = test_context(MockPriceProvider::new(&[]), sample_tokens());

        let output = search(&ctx, "", Some(2)).await.unwrap();
        assert!(output.contains("Showing 2 of 5 matches"), "{output}");
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let ctx = test_context(MockPriceProvider::new(&[]), sample_tokens());

        let output = search(&ctx, "zzzz", None).await.unwrap();
        assert_eq!(output, "No tokens match 'zzzz'");
    }

    #[test]
    fn test_render_marks_selected_token() {
        let tokens = sample_tokens();
        let refs: Vec<&Token> = tokens.iter().collect();

        let output = render_token_table(&refs, 10, Some("dai"));
        assert!(output.contains("DAI (selected)"));
    }
}
