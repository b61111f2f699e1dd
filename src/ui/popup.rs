use crate::{core::geo::Point, tools::inspect::InfoPayload};

/// The feature-info popup. Stays open until closed or replaced by the
/// next query.
#[derive(Debug, Clone, Default)]
pub struct Popup {
    position: Option<Point>,
    payload: Option<InfoPayload>,
}

impl Popup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever was shown with `payload` anchored at `position`
    pub fn show(&mut self, position: Point, payload: InfoPayload) {
        self.position = Some(position);
        self.payload = Some(payload);
    }

    pub fn close(&mut self) {
        self.position = None;
        self.payload = None;
    }

    pub fn is_open(&self) -> bool {
        self.payload.is_some()
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn payload(&self) -> Option<&InfoPayload> {
        self.payload.as_ref()
    }

    /// Title and body as plain text lines
    pub fn content(&self) -> Vec<String> {
        match &self.payload {
            Some(payload) => std::iter::once(payload.title())
                .chain(payload.lines())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::inspect::QueryKind;

    #[test]
    fn test_show_replaces_and_close_dismisses() {
        let mut popup = Popup::new();
        assert!(!popup.is_open());

        popup.show(
            Point::new(1.0, 2.0),
            InfoPayload::NotFound {
                kind: QueryKind::State,
            },
        );
        popup.show(
            Point::new(3.0, 4.0),
            InfoPayload::Coordinates {
                lon: "78.9629".into(),
                lat: "23.5937".into(),
            },
        );

        assert_eq!(popup.position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(
            popup.content(),
            ["Coordinates:", "Lon: 78.9629", "Lat: 23.5937"]
        );

        popup.close();
        assert!(!popup.is_open());
        assert!(popup.content().is_empty());
    }
}
