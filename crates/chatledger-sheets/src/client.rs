use async_trait::async_trait;
use chatledger_core::{CellRange, CoreError, TabularStore};
use chatledger_domain::{CellValue, Grid};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::{
    retry::{send_with_retry, RetryPolicy},
    values::{qualified_range, ValueRange},
    SheetsError,
};

const APPEND_ANCHOR: &str = "A1";

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Spreadsheet values API client bound to one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    base_url: Url,
    spreadsheet_id: String,
    access_token: Option<String>,
    retry: RetryPolicy,
}

impl SheetsClient {
    pub fn new(
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        access_token: Option<String>,
    ) -> Result<Self, SheetsError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SheetsError::BaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
            spreadsheet_id: spreadsheet_id.into(),
            access_token,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Confirms the spreadsheet is reachable with the configured credentials.
    pub async fn verify_access(&self) -> Result<usize, SheetsError> {
        let titles = self.sheet_titles().await?;
        info!(
            spreadsheet = %self.spreadsheet_id,
            sheets = titles.len(),
            "spreadsheet access verified"
        );
        Ok(titles.len())
    }

    /// `{base}/spreadsheets/{id}` followed by `extra` path segments.
    pub fn endpoint(&self, extra: &[&str]) -> Result<Url, SheetsError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SheetsError::BaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            segments.push("spreadsheets").push(&self.spreadsheet_id);
            segments.extend(extra);
        }
        Ok(url)
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        let url = self.endpoint(&[])?;
        let request = self
            .authorized(self.http.get(url))
            .query(&[("fields", "sheets.properties.title")]);
        let response = check(send_with_retry(request, &self.retry).await?).await?;
        let body: SpreadsheetResponse = response.json().await?;
        Ok(body
            .sheets
            .into_iter()
            .map(|entry| entry.properties.title)
            .collect())
    }

    async fn get_values(&self, range: String) -> Result<Grid, SheetsError> {
        let url = self.endpoint(&["values", range.as_str()])?;
        let request = self.authorized(self.http.get(url)).query(&[
            ("majorDimension", "ROWS"),
            ("valueRenderOption", "FORMATTED_VALUE"),
        ]);
        let response = check(send_with_retry(request, &self.retry).await?).await?;
        let body: ValueRange = response.json().await?;
        Ok(body.into_grid())
    }

    async fn append_values(&self, range: String, row: Vec<CellValue>) -> Result<(), SheetsError> {
        let url = self.endpoint(&["values", format!("{range}:append").as_str()])?;
        let body = ValueRange::rows(range, &vec![row]);
        let request = self
            .authorized(self.http.post(url))
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body);
        check(send_with_retry(request, &RetryPolicy::once()).await?).await?;
        Ok(())
    }

    async fn put_values(&self, range: String, values: &Grid) -> Result<(), SheetsError> {
        let url = self.endpoint(&["values", range.as_str()])?;
        let body = ValueRange::rows(range, values);
        let request = self
            .authorized(self.http.put(url))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body);
        check(send_with_retry(request, &self.retry).await?).await?;
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn check(response: Response) -> Result<Response, SheetsError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SheetsError::Unauthorized(status.as_u16()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SheetsError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response)
}

#[async_trait]
impl TabularStore for SheetsClient {
    async fn list_sheet_names(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.sheet_titles().await?)
    }

    async fn read_range(&self, sheet: &str, range: &CellRange) -> Result<Grid, CoreError> {
        let qualified = qualified_range(sheet, &range.expression()?);
        debug!(range = %qualified, "reading values");
        Ok(self.get_values(qualified).await?)
    }

    async fn append_row(&self, sheet: &str, row: Vec<CellValue>) -> Result<(), CoreError> {
        let qualified = qualified_range(sheet, APPEND_ANCHOR);
        debug!(range = %qualified, cells = row.len(), "appending row");
        Ok(self.append_values(qualified, row).await?)
    }

    async fn update_range(
        &self,
        sheet: &str,
        range: &CellRange,
        values: Grid,
    ) -> Result<(), CoreError> {
        let qualified = qualified_range(sheet, &range.expression()?);
        debug!(range = %qualified, "updating values");
        Ok(self.put_values(qualified, &values).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_qualified_ranges() {
        let client =
            SheetsClient::new("https://sheets.example.test/v4/", "abc123", None).expect("client");
        let range = qualified_range("GASTOS OCT 26", "A1");
        let url = client.endpoint(&["values", range.as_str()]).expect("url");
        assert_eq!(
            url.as_str(),
            "https://sheets.example.test/v4/spreadsheets/abc123/values/'GASTOS%20OCT%2026'!A1"
        );
    }

    #[test]
    fn endpoint_tolerates_missing_trailing_slash() {
        let client = SheetsClient::new("http://127.0.0.1:9/v4", "id", None).expect("client");
        assert_eq!(
            client.endpoint(&[]).expect("url").as_str(),
            "http://127.0.0.1:9/v4/spreadsheets/id"
        );
    }

    #[test]
    fn rejects_non_hierarchical_base_urls() {
        assert!(matches!(
            SheetsClient::new("mailto:ledger@example.test", "id", None),
            Err(SheetsError::BaseUrl(_))
        ));
    }
}
