//! AWS SQS queue client implementation.
//!
//! Wraps the official SQS SDK, bound to one primary queue URL for
//! receive/delete. Sends resolve the target queue's URL through the
//! `GetQueueUrl` API and cache it, so dead-letter sends do not pay a lookup
//! per message.

use crate::error::QueueError;
use crate::message::{MessageId, QueueName, ReceiptHandle, ReceivedMessage};
use crate::queue::{QueueClient, ReceiveParameters, MAX_RECEIVE_BATCH};
use async_trait::async_trait;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::MessageSystemAttributeName;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Queue client backed by AWS SQS
pub struct SqsQueueClient {
    client: aws_sdk_sqs::Client,
    queue_url: String,
    url_cache: RwLock<HashMap<QueueName, String>>,
}

impl SqsQueueClient {
    /// Create a client bound to one primary queue URL
    pub fn new(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
            url_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get the bound primary queue URL
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }

    /// Resolve a queue name to its URL, caching the lookup
    async fn resolve_queue_url(&self, queue: &QueueName) -> Result<String, QueueError> {
        if let Some(url) = self.url_cache.read().await.get(queue) {
            return Ok(url.clone());
        }

        let output = self
            .client
            .get_queue_url()
            .queue_name(queue.as_str())
            .send()
            .await
            .map_err(|err| map_sdk_error(queue.as_str(), err))?;

        let url = output
            .queue_url()
            .ok_or_else(|| QueueError::QueueNotFound {
                queue_name: queue.to_string(),
            })?
            .to_string();

        self.url_cache
            .write()
            .await
            .insert(queue.clone(), url.clone());
        Ok(url)
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn receive_messages(
        &self,
        params: &ReceiveParameters,
    ) -> Result<Vec<ReceivedMessage>, QueueError> {
        let max_messages = params.max_messages.min(MAX_RECEIVE_BATCH);
        let visibility_secs = params.visibility_timeout.as_secs() as i32;

        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages as i32)
            .visibility_timeout(visibility_secs)
            .wait_time_seconds(params.wait_time.as_secs() as i32)
            .message_system_attribute_names(MessageSystemAttributeName::ApproximateReceiveCount)
            .send()
            .await
            .map_err(|err| map_sdk_error(&self.queue_url, err))?;

        // Receipts expire with the visibility timeout; each redelivery of a
        // message carries a fresh handle.
        let expires_at = Utc::now() + chrono::Duration::seconds(i64::from(visibility_secs));

        let messages = output
            .messages()
            .iter()
            .filter_map(|message| {
                let receipt = message.receipt_handle()?.to_string();
                let receive_count = message
                    .attributes()
                    .and_then(|attrs| attrs.get(&MessageSystemAttributeName::ApproximateReceiveCount))
                    .and_then(|count| count.parse().ok())
                    .unwrap_or(1);

                Some(ReceivedMessage {
                    message_id: MessageId::new(message.message_id().unwrap_or_default()),
                    body: Bytes::from(message.body().unwrap_or_default().to_string()),
                    receipt_handle: ReceiptHandle::new(receipt, expires_at),
                    receive_count,
                })
            })
            .collect::<Vec<_>>();

        debug!(count = messages.len(), "Received messages from SQS");
        Ok(messages)
    }

    async fn delete_message(&self, receipt: &ReceiptHandle) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt.handle())
            .send()
            .await
            .map_err(|err| {
                if err.code() == Some("ReceiptHandleIsInvalid") {
                    QueueError::MessageNotFound {
                        receipt: receipt.handle().to_string(),
                    }
                } else {
                    map_sdk_error(&self.queue_url, err)
                }
            })?;

        Ok(())
    }

    async fn send_message(
        &self,
        queue: &QueueName,
        body: Bytes,
    ) -> Result<MessageId, QueueError> {
        let url = self.resolve_queue_url(queue).await?;

        let output = self
            .client
            .send_message()
            .queue_url(&url)
            .message_body(String::from_utf8_lossy(&body).into_owned())
            .send()
            .await
            .map_err(|err| map_sdk_error(queue.as_str(), err))?;

        Ok(MessageId::new(output.message_id().unwrap_or_default()))
    }
}

/// Map an SQS SDK error into the provider-agnostic error type
fn map_sdk_error<E>(queue: &str, err: SdkError<E>) -> QueueError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if matches!(err, SdkError::TimeoutError(_)) {
        return QueueError::Timeout;
    }

    if matches!(err, SdkError::DispatchFailure(_)) {
        return QueueError::ConnectionFailed {
            message: format!("{}", DisplayErrorContext(&err)),
        };
    }

    let code = err.code().unwrap_or("Unknown").to_string();
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}", DisplayErrorContext(&err)));

    match code.as_str() {
        "AWS.SimpleQueueService.NonExistentQueue" | "QueueDoesNotExist" => {
            QueueError::QueueNotFound {
                queue_name: queue.to_string(),
            }
        }
        "InvalidClientTokenId" | "UnrecognizedClientException" | "AccessDenied"
        | "AccessDeniedException" => QueueError::AuthenticationFailed { message },
        _ => QueueError::ServiceError { code, message },
    }
}
