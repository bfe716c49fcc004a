//! Chat over the sales history.
//!
//! Two halves, kept separate on purpose:
//!
//! - `build_context` is pure: it turns loaded reports + statistics into the
//!   text blob handed to the model as grounding data
//! - `ChatClient` is the transport: an OpenAI-compatible chat-completions
//!   client that keeps the running transcript so follow-up questions work
//!
//! The context is rebuilt from disk for every question; the model never sees
//! stale data after a fetch.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::ChatSettings;
use crate::domain::{ProductCount, Report, Summary};
use crate::error::AppError;
use crate::report::fmt_cop;

/// Build the grounding context: a per-report dump followed by the aggregate
/// statistics section.
pub fn build_context(
    reports: &[Report],
    summary: Option<&Summary>,
    top_products: &[ProductCount],
) -> String {
    if reports.is_empty() {
        return "No sales reports are available yet.".to_string();
    }

    let mut out = String::new();
    out.push_str("=== AVAILABLE SALES DATA ===\n\n");

    for (i, report) in reports.iter().enumerate() {
        let date = if report.date.is_empty() {
            "N/A"
        } else {
            report.date.as_str()
        };
        out.push_str(&format!("Report {} - date: {date}\n", i + 1));
        out.push_str(&format!("  sales: {}\n", report.sale_count));
        out.push_str(&format!("  day total: {}\n", fmt_cop(report.day_total)));

        if !report.sales.is_empty() {
            out.push_str("  line items:\n");
            for item in &report.sales {
                let code = if item.code.is_empty() {
                    "N/A"
                } else {
                    item.code.as_str()
                };
                out.push_str(&format!(
                    "    - [{code}] {} x{}: {} ({})\n",
                    item.product,
                    item.quantity,
                    fmt_cop(item.value),
                    if item.timestamp.is_empty() {
                        "N/A"
                    } else {
                        item.timestamp.as_str()
                    },
                ));
            }
        }
        out.push('\n');
    }

    if let Some(stats) = summary {
        out.push_str("=== OVERALL STATISTICS ===\n\n");
        out.push_str(&format!("Days recorded: {}\n", stats.days));
        out.push_str(&format!("Total revenue: {}\n", fmt_cop(stats.total)));
        out.push_str(&format!("Mean per day: {}\n", fmt_cop(stats.mean)));
        out.push_str(&format!("Median per day: {}\n", fmt_cop(stats.median)));
        out.push_str(&format!(
            "Best/worst day: {} / {}\n",
            fmt_cop(stats.max),
            fmt_cop(stats.min)
        ));
        out.push_str(&format!(
            "Most frequent product: {} ({} line items)\n",
            stats.mode_product.name, stats.mode_product.count
        ));
        if !top_products.is_empty() {
            out.push_str("Top products by units sold:\n");
            for product in top_products {
                out.push_str(&format!("  - {}: {} units\n", product.name, product.count));
            }
        }
    }

    out
}

fn system_prompt(context: &str) -> String {
    format!(
        "You are a financial assistant specializing in stationery-shop sales \
         analysis. You have access to the following sales data:\n\n{context}\n\
         Answer questions about trends, products, and statistics precisely, \
         using the numbers and dates given. All amounts are Colombian pesos \
         (COP). If something is not in the data, say so clearly."
    )
}

/// One message of the conversation, in the wire shape the API expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Blocking chat-completions client with a running transcript.
pub struct ChatClient {
    client: Client,
    settings: ChatSettings,
    transcript: Vec<ChatMessage>,
}

impl ChatClient {
    pub fn new(settings: ChatSettings) -> Result<Self, AppError> {
        settings.require_api_key()?;
        let client = Client::new();
        Ok(Self {
            client,
            settings,
            transcript: Vec::new(),
        })
    }

    /// Ask one question with the given grounding context. On success the
    /// question and answer are appended to the transcript.
    pub fn ask(&mut self, question: &str, context: &str) -> Result<String, AppError> {
        let api_key = self.settings.require_api_key()?.to_string();

        let mut messages = vec![ChatMessage::new("system", system_prompt(context))];
        messages.extend(self.transcript.iter().cloned());
        messages.push(ChatMessage::new("user", question));

        let request = ChatRequest {
            model: &self.settings.model,
            messages,
            temperature: 0.7,
            max_tokens: 1500,
        };

        let url = format!("{}/chat/completions", self.settings.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| AppError::new(4, format!("Chat API request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Chat API returned HTTP {}.", response.status()),
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| AppError::new(4, format!("Invalid chat API response: {e}")))?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::new(4, "Chat API response contained no choices."))?;

        self.transcript.push(ChatMessage::new("user", question));
        self.transcript
            .push(ChatMessage::new("assistant", answer.clone()));

        Ok(answer)
    }

    /// Drop the transcript and start a fresh conversation.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate, summarize, top_by_units};
    use crate::domain::LineItem;

    fn sample_reports() -> Vec<Report> {
        vec![Report {
            date: "2024-10-05".to_string(),
            sale_count: 2,
            day_total: 2300.0,
            sales: vec![
                LineItem {
                    number: 1,
                    code: "01".to_string(),
                    product: "Lapicero".to_string(),
                    description: String::new(),
                    value: 1500.0,
                    quantity: 1,
                    timestamp: "2024-10-05 10:15:00".to_string(),
                },
                LineItem {
                    number: 2,
                    code: "02".to_string(),
                    product: "Lapiz".to_string(),
                    description: String::new(),
                    value: 800.0,
                    quantity: 2,
                    timestamp: String::new(),
                },
            ],
        }]
    }

    #[test]
    fn context_for_no_reports_is_explicit() {
        assert_eq!(
            build_context(&[], None, &[]),
            "No sales reports are available yet."
        );
    }

    #[test]
    fn context_includes_reports_and_statistics() {
        let reports = sample_reports();
        let agg = aggregate(&reports);
        let summary = summarize(&agg).unwrap();
        let top = top_by_units(&agg.products, 5);

        let context = build_context(&reports, Some(&summary), &top);
        assert!(context.contains("Report 1 - date: 2024-10-05"));
        assert!(context.contains("[01] Lapicero x1: $ 1,500 COP"));
        assert!(context.contains("=== OVERALL STATISTICS ==="));
        assert!(context.contains("Total revenue: $ 2,300 COP"));
        assert!(context.contains("Lapiz: 2 units"));
    }

    #[test]
    fn client_requires_an_api_key() {
        let settings = ChatSettings {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        };
        assert!(ChatClient::new(settings).is_err());
    }
}
