// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Helpers for presenting search results.

use std::io;

use crate::Weight;

/// Formats a route cost, in hundredths of a second, as `HH:MM:SS`.
///
/// Fractions of a second are truncated; hours are not wrapped around.
pub fn format_driving_time(distance: Weight) -> String {
    let seconds = distance / 100;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Writes (latitude, longitude) pairs, one `lat,lon` pair per line.
pub fn write_coordinates<W: io::Write>(mut w: W, coordinates: &[(f64, f64)]) -> io::Result<()> {
    for &(lat, lon) in coordinates {
        writeln!(w, "{},{}", lat, lon)?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::line_graph;
    use crate::{find_route, SearchContext};

    #[test]
    fn driving_time() {
        assert_eq!(format_driving_time(0), "00:00:00");
        assert_eq!(format_driving_time(99), "00:00:00");
        assert_eq!(format_driving_time(6_150), "00:01:01");
        assert_eq!(format_driving_time(2_099_950), "05:49:59");
        assert_eq!(format_driving_time(36_000_000), "100:00:00");
    }

    #[test]
    fn coordinates() {
        let g = line_graph();
        let mut ctx = SearchContext::new(g.len());
        let route = find_route(&g, &mut ctx, 1, 3).unwrap().unwrap();

        let mut out = Vec::new();
        write_coordinates(&mut out, &route.coordinates(&g)).unwrap();

        let expected = format!(
            "{},{}\n{},{}\n",
            g.node(3).lat,
            g.node(3).lon,
            g.node(2).lat,
            g.node(2).lon
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
