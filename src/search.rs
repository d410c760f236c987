//! Semantic search over the recipe index and console rendering.

use anyhow::Result;
use recipe_search_core::search::SearchResult;
use recipe_search_core::store::VectorIndex;
use tracing::info;

use crate::config::{validate_query, validate_top_k};
use crate::context::AppContext;

/// Embed `query` and return up to `top_k` results, best first.
pub async fn search(
    ctx: &AppContext,
    index: &dyn VectorIndex,
    query: &str,
    top_k: usize,
) -> Result<Vec<SearchResult>> {
    validate_query(query)?;
    validate_top_k(top_k)?;
    let vector = ctx.embedder.embed(query).await?;
    let matches = index.query(&vector, top_k).await?;
    info!(index = index.name(), top_k, hits = matches.len(), "query complete");
    Ok(matches.into_iter().map(SearchResult::from).collect())
}

/// Render results as a fixed-width table.
///
/// ```text
/// #  ID                 Title              Content                                                Score
/// 1  vanilla-ice-cream  Vanilla Ice Cream  Whisk egg yolks with sugar, temper with warm milk ...  0.8123
/// ```
pub fn render_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results.\n".to_string();
    }

    let header = ["#", "ID", "Title", "Content", "Score"];
    let rows: Vec<[String; 5]> = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.id.clone(),
                r.title.clone(),
                r.content.replace('\n', " "),
                format!("{:.4}", r.score),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, header.iter().map(|s| s.to_string()), &widths);
    for row in rows {
        push_row(&mut out, row.into_iter(), &widths);
    }
    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize; 5]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.zip(widths.iter()).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(&cell);
        let pad = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// `recipe-search search`: ensure the index exists, run one query, print results.
pub async fn run_search(ctx: &AppContext, query: &str, top_k: usize) -> Result<()> {
    validate_query(query)?;
    validate_top_k(top_k)?;
    let index = ctx.open_index().await?;
    let results = search(ctx, index.as_ref(), query, top_k).await?;
    println!("Results for \"{}\":", query);
    print!("{}", render_results(&results));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, title: &str, content: &str, score: f32) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            score,
        }
    }

    #[test]
    fn empty_results() {
        assert_eq!(render_results(&[]), "No results.\n");
    }

    #[test]
    fn table_has_header_and_aligned_rows() {
        let out = render_results(&[
            result("vanilla-ice-cream", "Vanilla Ice Cream", "Whisk egg yolks...", 0.91234),
            result("tomato-soup", "Tomato Soup", "Soften onion", 0.5),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#  ID"));
        assert!(lines[1].starts_with("1  vanilla-ice-cream  Vanilla Ice Cream"));
        assert!(lines[1].ends_with("0.9123"));
        assert!(lines[2].ends_with("0.5000"));

        let col = lines[0].find("Title").unwrap();
        assert_eq!(&lines[2][col..col + "Tomato Soup".len()], "Tomato Soup");
    }

    #[test]
    fn newlines_in_content_are_flattened() {
        let out = render_results(&[result("a", "A", "line one\nline two", 0.1)]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("line one line two"));
    }
}
