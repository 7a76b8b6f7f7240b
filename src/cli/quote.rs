use super::{ui, view};
use crate::AppContext;
use crate::core::amount;
use crate::core::recent::RecencyList;
use crate::core::sync::{ExchangeRates, InputPair};
use crate::core::{PriceProvider, Quote, Side, Token, TokenPair};
use anyhow::Result;

/// Fetches both USD prices of `pair` concurrently. Each result is returned
/// with the token id it was requested for.
pub async fn fetch_pair_prices(
    provider: &dyn PriceProvider,
    pair: &TokenPair,
) -> [(String, Result<f64>); 2] {
    let from_id = pair.from_token().id.clone();
    let to_id = pair.to_token().id.clone();
    let (from_result, to_result) = futures::join!(
        provider.fetch_usd_price(&from_id),
        provider.fetch_usd_price(&to_id)
    );
    [(from_id, from_result), (to_id, to_result)]
}

/// Finds display data for a token id among the configured pair and the
/// recent tokens. Unknown ids use the id as name and symbol.
fn resolve_token(id: &str, pair: &TokenPair, recent: &RecencyList) -> Token {
    [pair.from_token(), pair.to_token()]
        .into_iter()
        .chain(recent.iter())
        .find(|t| t.id == id)
        .cloned()
        .unwrap_or_else(|| Token::new(id, id, id))
}

pub async fn quote(
    ctx: &AppContext,
    from: Option<&str>,
    to: Option<&str>,
    raw_amount: &str,
    reverse: bool,
) -> Result<String> {
    amount::validate(raw_amount)?;

    let configured = ctx.config.pair.to_pair();
    let recent = RecencyList::load(ctx.storage.as_ref());
    let mut pair = configured.clone();
    if let Some(id) = from {
        pair.replace(Side::From, resolve_token(id, &configured, &recent));
    }
    if let Some(id) = to {
        pair.replace(Side::To, resolve_token(id, &configured, &recent));
    }

    let pb = ui::new_spinner("Fetching prices...");
    let [(_, from_result), (_, to_result)] =
        fetch_pair_prices(ctx.price_provider.as_ref(), &pair).await;
    pb.finish_and_clear();

    let quotes = [
        Quote::from_result(&from_result),
        Quote::from_result(&to_result),
    ];

    let mut inputs = InputPair::new();
    inputs.apply_rates(ExchangeRates::new(quotes[0].usd(), quotes[1].usd()));
    let side = if reverse { Side::To } else { Side::From };
    inputs.edit(side, raw_amount)?;

    Ok(view::render_swap(&pair, &inputs, &quotes))
}

pub async fn run(
    ctx: &AppContext,
    from: Option<&str>,
    to: Option<&str>,
    raw_amount: &str,
    reverse: bool,
) -> Result<()> {
    let output = quote(ctx, from, to, raw_amount, reverse).await?;
    println!("{output}");
    Ok(())
}
