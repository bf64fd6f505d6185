//! Postgres implementations of the temperament_core port traits.
//!
//! Each adapter is a newtype wrapping PgPool. All SQL is runtime-checked
//! (sqlx::query, not sqlx::query!) to avoid compile-time DB requirement.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;

use temperament_core::compose::MAX_CHARACTERS;
use temperament_core::ports::{ReferenceStore, ResultStore, TemplateStore};
use temperament_core::{
    Classification, Language, NewReportRecord, ReferenceText, ReportRecord, Result, ResultId,
    SubTemperament, Temperament, TemperamentError, TemperamentText,
};

// ── Row types ─────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct PgResultRow {
    id: i64,
    usuario_id: String,
    nome: String,
    email: String,
    telefone: Option<String>,
    data_nascimento: NaiveDate,
    data_teste: NaiveDate,
    inicio: Option<String>,
    fim: Option<String>,
    tempo_teste: String,
    idade: i32,
    aceite_termos: bool,
    aceite_contato: bool,
    temperamento: String,
    subtemperamento: String,
    criado_em: DateTime<Utc>,
}

impl TryFrom<PgResultRow> for ReportRecord {
    type Error = TemperamentError;

    fn try_from(row: PgResultRow) -> Result<Self> {
        let temperament = Temperament::from_label(&row.temperamento).ok_or_else(|| {
            anyhow!("result {} has unknown temperament {:?}", row.id, row.temperamento)
        })?;
        let subtemperament = SubTemperament::from_label(&row.subtemperamento).ok_or_else(|| {
            anyhow!(
                "result {} has unknown sub-temperament {:?}",
                row.id,
                row.subtemperamento
            )
        })?;
        Ok(ReportRecord {
            id: row.id,
            user_id: row.usuario_id,
            name: row.nome,
            email: row.email,
            phone: row.telefone,
            birth_date: row.data_nascimento,
            test_date: row.data_teste,
            started_at: row.inicio,
            finished_at: row.fim,
            test_duration: row.tempo_teste,
            age: u32::try_from(row.idade).unwrap_or(0),
            consent_terms: row.aceite_termos,
            consent_contact: row.aceite_contato,
            classification: Classification {
                temperament,
                subtemperament,
            },
            created_at: row.criado_em,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PgTemperamentRow {
    descricao: Option<String>,
    comportamento: Option<String>,
    positivo: Option<String>,
    atencao: Option<String>,
    desafio: Option<String>,
    sugestao: Option<String>,
}

impl From<PgTemperamentRow> for TemperamentText {
    fn from(row: PgTemperamentRow) -> Self {
        Self {
            description: row.descricao,
            behavior: row.comportamento,
            positive: row.positivo,
            caution: row.atencao,
            challenge: row.desafio,
            suggestion: row.sugestao,
        }
    }
}

// ── PgResultStore ─────────────────────────────────────────────

pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn save_result(&self, record: &NewReportRecord) -> Result<ResultId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO resultados
                (usuario_id, nome, email, telefone, data_nascimento, data_teste,
                 inicio, fim, tempo_teste, idade, aceite_termos, aceite_contato,
                 temperamento, subtemperamento)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(record.birth_date)
        .bind(record.test_date)
        .bind(&record.started_at)
        .bind(&record.finished_at)
        .bind(&record.test_duration)
        .bind(i32::try_from(record.age).unwrap_or(i32::MAX))
        .bind(record.consent_terms)
        .bind(record.consent_contact)
        .bind(record.classification.temperament.label())
        .bind(record.classification.subtemperament.label())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(id)
    }

    async fn load_result(&self, id: ResultId) -> Result<Option<ReportRecord>> {
        let row = sqlx::query_as::<_, PgResultRow>(
            r#"
            SELECT id, usuario_id, nome, email, telefone, data_nascimento, data_teste,
                   inicio, fim, tempo_teste, idade, aceite_termos, aceite_contato,
                   temperamento, subtemperamento, criado_em
            FROM resultados
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        row.map(ReportRecord::try_from).transpose()
    }
}

// ── PgReferenceStore ──────────────────────────────────────────

pub struct PgReferenceStore {
    pool: PgPool,
}

impl PgReferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn temperament_text(&self, t: Temperament, lang: Language) -> Result<Option<TemperamentText>> {
        let sql = match lang {
            Language::Pt => {
                r#"
                SELECT descricao, comportamento, positivo, atencao, desafio, sugestao
                FROM temperamentos WHERE temperamento = $1
                "#
            }
            Language::En => {
                r#"
                SELECT descricao_en AS descricao, comportamento_en AS comportamento,
                       positivo_en AS positivo, atencao_en AS atencao,
                       desafio_en AS desafio, sugestao_en AS sugestao
                FROM temperamentos WHERE temperamento = $1
                "#
            }
        };
        let row = sqlx::query_as::<_, PgTemperamentRow>(sql)
            .bind(t.label())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(row.map(TemperamentText::from))
    }

    async fn subtemperament_description(
        &self,
        s: SubTemperament,
        lang: Language,
    ) -> Result<Option<String>> {
        let sql = match lang {
            Language::Pt => "SELECT descricao FROM subtemperamentos WHERE subtemperamento = $1",
            Language::En => "SELECT descricao_en FROM subtemperamentos WHERE subtemperamento = $1",
        };
        let description: Option<Option<String>> = sqlx::query_scalar(sql)
            .bind(s.label())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(description.flatten())
    }

    async fn characters(&self, t: Temperament, lang: Language) -> Result<Vec<String>> {
        let sql = match lang {
            Language::Pt => {
                "SELECT descricao FROM personagens WHERE temperamento = $1 ORDER BY id LIMIT $2"
            }
            Language::En => {
                r#"
                SELECT descricao_en FROM personagens
                WHERE temperamento = $1 AND descricao_en IS NOT NULL
                ORDER BY id LIMIT $2
                "#
            }
        };
        let rows: Vec<String> = sqlx::query_scalar(sql)
            .bind(t.label())
            .bind(MAX_CHARACTERS as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(rows)
    }
}

#[async_trait]
impl ReferenceStore for PgReferenceStore {
    async fn reference_text(
        &self,
        classification: &Classification,
        lang: Language,
    ) -> Result<ReferenceText> {
        let temperament = self.temperament_text(classification.temperament, lang).await?;
        let subtemperament_description = self
            .subtemperament_description(classification.subtemperament, lang)
            .await?;
        let characters = self.characters(classification.temperament, lang).await?;
        debug!(
            temperament = %classification.temperament,
            subtemperament = %classification.subtemperament,
            lang = lang.as_str(),
            has_temperament_text = temperament.is_some(),
            has_subtemperament_text = subtemperament_description.is_some(),
            characters = characters.len(),
            "reference text loaded"
        );
        Ok(ReferenceText {
            temperament,
            subtemperament_description,
            characters,
        })
    }
}

// ── PgTemplateStore ───────────────────────────────────────────

pub struct PgTemplateStore {
    pool: PgPool,
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn load_template(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let file: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT file FROM pdf_templates WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;
        Ok(file)
    }

    async fn save_template(&self, name: &str, bytes: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pdf_templates (name, file)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE
            SET file = EXCLUDED.file, updated_at = now()
            "#,
        )
        .bind(name)
        .bind(bytes)
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        Ok(())
    }
}
