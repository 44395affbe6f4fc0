//! [`Email`]s composed out of [`Quote`]s.

use std::fmt::Write as _;

use crate::domain::{contact, quote, Quote};

use super::Email;

impl Email {
    /// Composes an [`Email`] offering the provided [`Quote`] to its
    /// [`Client`] for a response via the provided `link`.
    ///
    /// [`Client`]: crate::domain::Client
    #[must_use]
    pub fn quote_offer(
        to: contact::Email,
        quote: &Quote,
        items: &[quote::Item],
        link: &str,
    ) -> Self {
        let Quote {
            number,
            client_name,
            reference,
            location,
            due_on,
            totals,
            ..
        } = quote;

        let mut rows = String::new();
        let mut lines = String::new();
        for item in items {
            let subtotal =
                item.subtotal().map(|m| m.to_string()).unwrap_or_default();
            let description = html_escape(item.line.description().as_ref());
            _ = write!(
                rows,
                "<tr><td>{description}</td><td>{}</td><td>{}</td>\
                 <td>{}</td></tr>",
                item.line.quantity(),
                item.line.unit_price(),
                subtotal,
            );
            _ = writeln!(
                lines,
                "- {} x{}: {}",
                item.line.description(),
                item.line.quantity(),
                subtotal,
            );
        }
        let due = due_on
            .as_ref()
            .map(|d| format!("Válida hasta: {d}\n"))
            .unwrap_or_default();

        Self {
            to,
            subject: format!("Cotización {number} - {reference}"),
            html: format!(
                "<p>Estimado/a {client}:</p>\
                 <p>Adjuntamos la cotización <b>{number}</b> por \
                 \"{reference_html}\" en {location_html}.</p>\
                 <table>\
                 <tr><th>Descripción</th><th>Cantidad</th>\
                 <th>Precio unitario</th><th>Subtotal</th></tr>\
                 {rows}</table>\
                 <p>Neto: {net}<br>IVA: {vat}<br><b>Total: {total}</b></p>\
                 <p><a href=\"{link}\">Responder a la cotización</a></p>",
                client = html_escape(client_name.as_ref()),
                reference_html = html_escape(reference.as_ref()),
                location_html = html_escape(location.as_ref()),
                net = totals.net,
                vat = totals.vat,
                total = totals.total,
            ),
            text: format!(
                "Estimado/a {client_name}:\n\n\
                 Cotización {number} por \"{reference}\" en {location}.\n\n\
                 {lines}\n\
                 Neto: {net}\nIVA: {vat}\nTotal: {total}\n{due}\n\
                 Puede responder en: {link}\n",
                net = totals.net,
                vat = totals.vat,
                total = totals.total,
            ),
        }
    }

    /// Composes an [`Email`] asking the [`Client`] for a feedback on the
    /// finalized [`Quote`].
    ///
    /// [`Client`]: crate::domain::Client
    #[must_use]
    pub fn feedback_request(to: contact::Email, quote: &Quote) -> Self {
        let Quote {
            number,
            client_name,
            reference,
            ..
        } = quote;

        Self {
            to,
            subject: format!("¿Cómo fue nuestro trabajo? Cotización {number}"),
            html: format!(
                "<p>Estimado/a {client}:</p>\
                 <p>Hace unos días finalizamos el trabajo \"{reference}\" \
                 (cotización <b>{number}</b>).</p>\
                 <p>Nos encantaría conocer su opinión. Puede responder \
                 directamente a este correo.</p>",
                client = html_escape(client_name.as_ref()),
                reference = html_escape(reference.as_ref()),
            ),
            text: format!(
                "Estimado/a {client_name}:\n\n\
                 Hace unos días finalizamos el trabajo \"{reference}\" \
                 (cotización {number}).\n\n\
                 Nos encantaría conocer su opinión. Puede responder \
                 directamente a este correo.\n",
            ),
        }
    }
}

/// Escapes the provided `text` for embedding into HTML.
fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod spec {
    use super::html_escape;

    #[test]
    fn escapes_html() {
        assert_eq!(
            html_escape("<b>\"Bombas & Motores\"</b>"),
            "&lt;b&gt;&quot;Bombas &amp; Motores&quot;&lt;/b&gt;",
        );
        assert_eq!(html_escape("Osorno"), "Osorno");
    }
}
