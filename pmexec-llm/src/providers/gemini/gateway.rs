//! Gemini assistant gateway

use super::client::{GeminiClient, GeminiConfig, PROVIDER_ID};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::{normalize_query, prompt, schema, AssistantGateway, GatewayError, GatewayResult};
use async_trait::async_trait;
use pmexec_core::{ApplicationState, AssistantProposal};

/// Gateway backed by Gemini structured output.
#[derive(Debug)]
pub struct GeminiGateway {
    client: GeminiClient,
    model: String,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> GatewayResult<Self> {
        Ok(Self {
            client: GeminiClient::new(&config)?,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, content: String) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(content)],
            system_instruction: Some(Content::system(prompt::SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationConfig::json(schema::response_schema())),
        }
    }
}

#[async_trait]
impl AssistantGateway for GeminiGateway {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn propose_update(
        &self,
        query: &str,
        state: &ApplicationState,
    ) -> GatewayResult<AssistantProposal> {
        let query = normalize_query(query)?;
        let request = self.build_request(prompt::user_content(query, state)?);

        tracing::debug!(
            model = %self.model,
            resources = state.resources.len(),
            logs = state.logs.len(),
            "Sending assistant query"
        );

        let endpoint = format!("models/{}:generateContent", self.model);
        let response: GenerateContentResponse = self.client.request(&endpoint, &request).await?;

        if let Some(usage) = &response.usage_metadata {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Assistant usage"
            );
        }

        let text = response.first_text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            GatewayError::transport(
                PROVIDER_ID,
                None,
                format!("Response carried no text ({})", reason),
            )
        })?;

        let proposal = schema::parse_proposal(&text)?;
        tracing::info!(
            new_resources = proposal.new_resources.len(),
            new_logs = proposal.new_logs.len(),
            warnings = proposal.warnings.len(),
            "Assistant proposal validated"
        );
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_instruction_and_schema() {
        let gateway = GeminiGateway::new(GeminiConfig::new("k")).unwrap();
        let request = gateway.build_request("Current state: {}. User Input: hi".to_string());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            value["generationConfig"]["responseSchema"]["required"][3],
            "updatedKPIs"
        );
        let instruction = value["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(instruction.contains("Process 6.3"));
    }

    #[tokio::test]
    async fn test_blank_query_fails_before_network() {
        // unroutable base url: reaching the network would produce a transport error
        let config = GeminiConfig::new("k").with_base_url("http://127.0.0.1:9");
        let gateway = GeminiGateway::new(config).unwrap();
        let err = gateway
            .propose_update("  ", &ApplicationState::new())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::EmptyQuery);
    }
}
