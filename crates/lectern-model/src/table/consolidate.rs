use crate::TextBody;

/// Append the non-empty paragraphs of each source body to `anchor`, in order.
///
/// Once anything has been appended, empty placeholder paragraphs are removed from the
/// anchor so a previously blank anchor does not end up with a leading blank line. If no
/// source contributes text the anchor is left untouched.
pub fn consolidate_paragraphs(anchor: &mut TextBody, sources: impl IntoIterator<Item = TextBody>) {
    let before = anchor.paragraphs.len();
    for source in sources {
        anchor
            .paragraphs
            .extend(source.paragraphs.into_iter().filter(|p| !p.is_empty()));
    }
    if anchor.paragraphs.len() == before {
        return;
    }
    anchor.paragraphs.retain(|p| !p.is_empty());
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Paragraph;

    #[test]
    fn appends_in_order_and_drops_blank_placeholders() {
        let mut anchor = TextBody {
            paragraphs: vec![Paragraph::plain("")],
            ..TextBody::default()
        };
        consolidate_paragraphs(
            &mut anchor,
            [TextBody::from_text("b\n\nc"), TextBody::from_text("d")],
        );
        assert_eq!(anchor.text(), "b\nc\nd");
        assert_eq!(anchor.paragraphs.len(), 3);
    }

    #[test]
    fn keeps_existing_anchor_text_first() {
        let mut anchor = TextBody::from_text("a");
        consolidate_paragraphs(&mut anchor, [TextBody::from_text("b")]);
        assert_eq!(anchor.text(), "a\nb");
    }

    #[test]
    fn empty_sources_leave_anchor_untouched() {
        let mut anchor = TextBody {
            paragraphs: vec![Paragraph::plain("a"), Paragraph::plain("")],
            ..TextBody::default()
        };
        let before = anchor.clone();
        consolidate_paragraphs(&mut anchor, [TextBody::default(), TextBody::from_text("")]);
        assert_eq!(anchor, before);
    }
}
