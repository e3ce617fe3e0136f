//! Dispatch pipeline
//!
//! Renders the active message template for a chosen offer, sends it through
//! the WhatsApp channel bound to the group's chat, and records the outcome
//! as an append-only log entry. Channel failures become ERROR log rows and
//! are returned as values, never raised: one group's failed send must not
//! abort the batch.

use tracing::{info, debug};
use crate::database::DatabaseService;
use crate::models::{Group, LogEntry, LogStatus, CreateLogRequest, Offer};
use crate::services::channel::{ChannelStatus, WhatsAppChannel};
use crate::utils::errors::{ZapOfertasError, Result};
use crate::utils::helpers::format_price_brl;
use crate::utils::logging::log_dispatch;

/// Render a template body for an offer
///
/// Recognized placeholders: {title}, {price}, {original_price}, {discount},
/// {link}. Unrecognized placeholders are left verbatim; rendering never
/// fails on unknown input.
pub fn render_message(template: &str, offer: &Offer) -> String {
    template
        .replace("{title}", &offer.title)
        .replace("{price}", &format_price_brl(offer.price))
        .replace("{original_price}", &format_price_brl(offer.original_price))
        .replace("{discount}", &offer.discount_percent.to_string())
        .replace("{link}", &offer.affiliate_link)
}

/// Dispatch service: template rendering, channel send, log append
#[derive(Debug, Clone)]
pub struct DispatchService {
    channel: WhatsAppChannel,
    db: DatabaseService,
}

impl DispatchService {
    pub fn new(channel: WhatsAppChannel, db: DatabaseService) -> Self {
        Self { channel, db }
    }

    /// Send the chosen offer to the group's bound chat and log the outcome
    ///
    /// Returns the log entry for both the success and the channel-failure
    /// paths. A missing active template is a configuration error and does
    /// propagate; the scheduler's per-group boundary contains it.
    pub async fn dispatch(&self, group: &Group, offer: &Offer) -> Result<LogEntry> {
        let template = self.db.templates
            .get_active()
            .await?
            .ok_or(ZapOfertasError::TemplateNotFound)?;

        let text = render_message(&template.content, offer);
        let price = format_price_brl(offer.price);

        let send_result = match &group.chat_id {
            Some(chat_id) => match self.channel.status().await {
                Ok(ChannelStatus::Connected) => self.channel.send_message(chat_id, &text).await,
                Ok(status) => Err(ZapOfertasError::Channel(
                    format!("channel not connected: {:?}", status)
                )),
                Err(e) => Err(e),
            },
            None => Err(ZapOfertasError::Channel(
                "group has no bound chat identifier".to_string()
            )),
        };

        match send_result {
            Ok(()) => {
                self.db.groups.record_dispatch(group.id, &group.rotation_state.0).await?;

                let entry = self.db.logs
                    .append(CreateLogRequest {
                        group_name: group.name.clone(),
                        product_title: offer.title.clone(),
                        price,
                        status: LogStatus::Sent,
                        error_message: None,
                    })
                    .await?;

                log_dispatch(&group.name, &offer.title, true, None);
                info!(group_id = group.id, log_id = entry.id, "Dispatch recorded");
                Ok(entry)
            }
            Err(e) => {
                let reason = e.to_string();
                let entry = self.db.logs
                    .append(CreateLogRequest {
                        group_name: group.name.clone(),
                        product_title: offer.title.clone(),
                        price,
                        status: LogStatus::Error,
                        error_message: Some(reason.clone()),
                    })
                    .await?;

                log_dispatch(&group.name, &offer.title, false, Some(&reason));
                debug!(group_id = group.id, "Dispatch failure logged, batch continues");
                Ok(entry)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> Offer {
        Offer {
            title: "Kit Casa Organização".to_string(),
            price: 34.9,
            original_price: 49.9,
            discount_percent: 30,
            rating: 4.7,
            sales_count: 2300,
            affiliate_link: "https://s.shopee.com.br/xyz".to_string(),
            category_id: Some(100113),
        }
    }

    #[test]
    fn renders_all_recognized_placeholders() {
        let template = "🔥 {title}\nDe ~{original_price}~ por {price} ({discount}% OFF)\n{link}";
        let rendered = render_message(template, &offer());

        assert_eq!(
            rendered,
            "🔥 Kit Casa Organização\nDe ~R$ 49,90~ por R$ 34,90 (30% OFF)\nhttps://s.shopee.com.br/xyz"
        );
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let rendered = render_message("{title} - {cupom} - {loja}", &offer());
        assert_eq!(rendered, "Kit Casa Organização - {cupom} - {loja}");
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let rendered = render_message("oferta do dia", &offer());
        assert_eq!(rendered, "oferta do dia");
    }
}
