//! Reference data import.
//!
//! Source files are `;`-separated CSV without a header row. Rows with a
//! missing or empty column, or with a label the classifier never produces,
//! are skipped with a warning. Imports upsert on the label.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{info, warn};

use temperament_core::{SubTemperament, Temperament};

pub const TEMPERAMENT_COLUMNS: usize = 14;
pub const SUBTEMPERAMENT_COLUMNS: usize = 4;

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// One `temperamentos` row: label, six pt texts, English name, six en texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperamentCsvRow {
    pub columns: [String; TEMPERAMENT_COLUMNS],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTemperamentCsvRow {
    pub label: String,
    pub description: String,
    pub label_en: String,
    pub description_en: String,
}

/// Reads complete rows of exactly `width` non-empty columns.
fn read_rows<R: Read>(
    source: R,
    width: usize,
    known_label: impl Fn(&str) -> bool,
) -> Result<(Vec<Vec<String>>, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        let columns: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();

        if columns.len() < width || columns[..width].iter().any(|c| c.is_empty()) {
            warn!(row = idx + 1, columns = columns.len(), "skipping incomplete row");
            skipped += 1;
            continue;
        }
        if !known_label(&columns[0]) {
            warn!(row = idx + 1, label = %columns[0], "skipping row with unknown label");
            skipped += 1;
            continue;
        }
        rows.push(columns.into_iter().take(width).collect());
    }
    Ok((rows, skipped))
}

pub fn parse_temperaments<R: Read>(source: R) -> Result<(Vec<TemperamentCsvRow>, usize)> {
    let (rows, skipped) = read_rows(source, TEMPERAMENT_COLUMNS, |label| {
        Temperament::from_label(label).is_some()
    })?;
    let rows = rows
        .into_iter()
        .filter_map(|cols| <[String; TEMPERAMENT_COLUMNS]>::try_from(cols).ok())
        .map(|columns| TemperamentCsvRow { columns })
        .collect();
    Ok((rows, skipped))
}

pub fn parse_subtemperaments<R: Read>(source: R) -> Result<(Vec<SubTemperamentCsvRow>, usize)> {
    let (rows, skipped) = read_rows(source, SUBTEMPERAMENT_COLUMNS, |label| {
        SubTemperament::from_label(label).is_some()
    })?;
    let rows = rows
        .into_iter()
        .filter_map(|cols| {
            let [label, description, label_en, description_en] =
                <[String; SUBTEMPERAMENT_COLUMNS]>::try_from(cols).ok()?;
            Some(SubTemperamentCsvRow {
                label,
                description,
                label_en,
                description_en,
            })
        })
        .collect();
    Ok((rows, skipped))
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))
}

pub async fn import_temperaments(pool: &PgPool, path: &Path) -> Result<ImportSummary> {
    let (rows, skipped) = parse_temperaments(open(path)?)?;
    info!(file = %path.display(), rows = rows.len(), skipped, "importing temperaments");

    let mut tx = pool.begin().await?;
    for row in &rows {
        let mut query = sqlx::query(
            r#"
            INSERT INTO temperamentos
                (temperamento, descricao, comportamento, positivo, atencao, desafio, sugestao,
                 temperamento_en, descricao_en, comportamento_en, positivo_en, atencao_en,
                 desafio_en, sugestao_en)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (temperamento) DO UPDATE
            SET descricao = EXCLUDED.descricao,
                comportamento = EXCLUDED.comportamento,
                positivo = EXCLUDED.positivo,
                atencao = EXCLUDED.atencao,
                desafio = EXCLUDED.desafio,
                sugestao = EXCLUDED.sugestao,
                temperamento_en = EXCLUDED.temperamento_en,
                descricao_en = EXCLUDED.descricao_en,
                comportamento_en = EXCLUDED.comportamento_en,
                positivo_en = EXCLUDED.positivo_en,
                atencao_en = EXCLUDED.atencao_en,
                desafio_en = EXCLUDED.desafio_en,
                sugestao_en = EXCLUDED.sugestao_en
            "#,
        );
        for column in &row.columns {
            query = query.bind(column);
        }
        query
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to upsert temperament {}", row.columns[0]))?;
    }
    tx.commit().await?;

    info!(imported = rows.len(), skipped, "temperament import complete");
    Ok(ImportSummary {
        imported: rows.len(),
        skipped,
    })
}

pub async fn import_subtemperaments(pool: &PgPool, path: &Path) -> Result<ImportSummary> {
    let (rows, skipped) = parse_subtemperaments(open(path)?)?;
    info!(file = %path.display(), rows = rows.len(), skipped, "importing sub-temperaments");

    let mut tx = pool.begin().await?;
    for row in &rows {
        sqlx::query(
            r#"
            INSERT INTO subtemperamentos (subtemperamento, descricao, subtemperamento_en, descricao_en)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subtemperamento) DO UPDATE
            SET descricao = EXCLUDED.descricao,
                subtemperamento_en = EXCLUDED.subtemperamento_en,
                descricao_en = EXCLUDED.descricao_en
            "#,
        )
        .bind(&row.label)
        .bind(&row.description)
        .bind(&row.label_en)
        .bind(&row.description_en)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to upsert sub-temperament {}", row.label))?;
    }
    tx.commit().await?;

    info!(imported = rows.len(), skipped, "sub-temperament import complete");
    Ok(ImportSummary {
        imported: rows.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperament_line(label: &str) -> String {
        let mut cols = vec![label.to_string()];
        cols.extend((1..TEMPERAMENT_COLUMNS).map(|i| format!("texto {i}")));
        cols.join(";")
    }

    #[test]
    fn test_parse_temperaments_skips_incomplete_rows() {
        let csv = format!(
            "{}\nColérico;so;poucas;colunas\n{}\n",
            temperament_line("Sanguíneo"),
            temperament_line("Fleumático").replace("texto 5", " ")
        );
        let (rows, skipped) = parse_temperaments(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(skipped, 2);
        assert_eq!(rows[0].columns[0], "Sanguíneo");
        assert_eq!(rows[0].columns[13], "texto 13");
    }

    #[test]
    fn test_parse_temperaments_skips_unknown_label() {
        let csv = format!("{}\n", temperament_line("Alegre"));
        let (rows, skipped) = parse_temperaments(csv.as_bytes()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_parse_subtemperaments() {
        let csv = "Água;Flui;Water;Flows\nBrisa;;Breeze;Light\nVento;Forte;Wind;Strong;extra\n";
        let (rows, skipped) = parse_subtemperaments(csv.as_bytes()).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(
            rows,
            vec![
                SubTemperamentCsvRow {
                    label: "Água".into(),
                    description: "Flui".into(),
                    label_en: "Water".into(),
                    description_en: "Flows".into(),
                },
                SubTemperamentCsvRow {
                    label: "Vento".into(),
                    description: "Forte".into(),
                    label_en: "Wind".into(),
                    description_en: "Strong".into(),
                },
            ]
        );
    }

    #[test]
    fn test_text_with_commas_stays_in_one_column() {
        let csv = "Gelo;Calmo, frio e preciso;Ice;Calm, cold, precise\n";
        let (rows, _) = parse_subtemperaments(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].description, "Calmo, frio e preciso");
    }
}
