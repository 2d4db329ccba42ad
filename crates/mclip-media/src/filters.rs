//! FFmpeg filter expressions for clip effects.
//!
//! Every builder returns a single filter (or a comma-joined chain) that is
//! appended to the clip's `-vf` / `-af` chain in order, so later effects see
//! the timeline produced by earlier ones.

/// Lowest tempo factor accepted by a single `atempo` instance.
const ATEMPO_MIN: f64 = 0.5;
/// Highest tempo factor accepted by a single `atempo` instance.
const ATEMPO_MAX: f64 = 2.0;

/// Video filter that plays frames `factor` times faster.
pub fn speed_video_filter(factor: f64) -> String {
    format!("setpts=PTS/{}", format_number(factor))
}

/// Audio filter that plays samples `factor` times faster without changing pitch.
///
/// `atempo` only accepts [0.5, 2.0] per instance, so larger changes are split
/// into several chained instances.
pub fn speed_audio_filter(factor: f64) -> String {
    atempo_factors(factor)
        .into_iter()
        .map(|f| format!("atempo={}", format_number(f)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a tempo factor into `atempo`-sized steps whose product is `factor`.
pub(crate) fn atempo_factors(factor: f64) -> Vec<f64> {
    let mut remaining = factor;
    let mut factors = Vec::new();

    while remaining > ATEMPO_MAX {
        factors.push(ATEMPO_MAX);
        remaining /= ATEMPO_MAX;
    }
    while remaining < ATEMPO_MIN {
        factors.push(ATEMPO_MIN);
        remaining /= ATEMPO_MIN;
    }
    factors.push(remaining);

    factors
}

/// Fade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

impl Fade {
    fn as_str(self) -> &'static str {
        match self {
            Fade::In => "in",
            Fade::Out => "out",
        }
    }
}

/// Video fade starting at `start` seconds on the clip timeline.
pub fn fade_video_filter(fade: Fade, start: f64, duration: f64) -> String {
    format!(
        "fade=t={}:st={}:d={}",
        fade.as_str(),
        format_number(start),
        format_number(duration)
    )
}

/// Audio fade matching [`fade_video_filter`].
pub fn fade_audio_filter(fade: Fade, start: f64, duration: f64) -> String {
    format!(
        "afade=t={}:st={}:d={}",
        fade.as_str(),
        format_number(start),
        format_number(duration)
    )
}

/// Escape a value for use inside a filter option in a `-vf`/`-af` graph.
///
/// The graph parser strips one level of escaping before the option parser
/// sees the value, so the option level (`\` `'` `:`) is escaped first and
/// the result is escaped again for the graph level (`\` `'` `,` `;` `[` `]`).
pub fn escape_filter_value(value: &str) -> String {
    let option_level = escape_chars(value, &['\\', '\'', ':']);
    escape_chars(&option_level, &['\\', '\'', ',', ';', '[', ']'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Format seconds/factors compactly (`1.5`, `2`, `0.333333`).
pub(crate) fn format_number(value: f64) -> String {
    let formatted = format!("{:.6}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_filters() {
        assert_eq!(speed_video_filter(1.5), "setpts=PTS/1.5");
        assert_eq!(speed_audio_filter(1.5), "atempo=1.5");
        assert_eq!(speed_audio_filter(4.0), "atempo=2,atempo=2");
        assert_eq!(speed_audio_filter(0.25), "atempo=0.5,atempo=0.5");
    }

    #[test]
    fn test_atempo_factors_multiply_back() {
        for factor in [0.1, 0.3, 0.75, 1.0, 3.0, 10.0] {
            let factors = atempo_factors(factor);
            let product: f64 = factors.iter().product();
            assert!((product - factor).abs() < 1e-9, "factor {}", factor);
            assert!(factors.iter().all(|f| (ATEMPO_MIN..=ATEMPO_MAX).contains(f)));
        }
    }

    #[test]
    fn test_fade_filters() {
        assert_eq!(fade_video_filter(Fade::In, 0.0, 0.5), "fade=t=in:st=0:d=0.5");
        assert_eq!(fade_audio_filter(Fade::Out, 44.5, 0.5), "afade=t=out:st=44.5:d=0.5");
    }

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("/tmp/a.txt"), "/tmp/a.txt");
        assert_eq!(escape_filter_value("/tmp/a:b.txt"), "/tmp/a\\\\:b.txt");
        assert_eq!(escape_filter_value("C:\\subs"), "C\\\\:\\\\\\\\subs");
        assert_eq!(escape_filter_value("it's,[x]"), "it\\\\\\'s\\,\\[x\\]");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(65.25), "65.25");
    }
}
