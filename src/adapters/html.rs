//! HTML status page renderer.
//!
//! Implements [`Renderer`] for the page served at `/`:
//!
//! 1. Summary boxes: average water temperature, heater status, showers in
//!    use, current water usage.
//! 2. Weekly chart: one column per day, one bar per slot.  Bar height and
//!    colour (blue → red) follow the slot's rolling average relative to
//!    full scale.  Below each column, the day's max and min with the hour
//!    of the slot they fall in.
//! 3. Technician section: per-shower status and a threshold slider.
//!    Releasing a slider reloads `/` with `threshold1`/`threshold2` in the
//!    query, which is how thresholds are changed.

use core::fmt::Write as _;

use crate::app::ports::Renderer;
use crate::app::snapshot::{DaySummary, PageModel, occupancy_label};
use crate::config::HistorySource;
use crate::http::router::THRESHOLD_PARAMS;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Red channel at full scale; blue is its complement.
const RED_AT_FULL_SCALE: f32 = 220.0;

pub struct HtmlRenderer {
    pub bar_width_px: u32,
    pub bar_height_px: u32,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            bar_width_px: 8,
            bar_height_px: 150,
        }
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(height_px, css colour)` for one slot.
    pub fn bar_style(&self, value: f32, full_scale: f32) -> (u32, String) {
        let ratio = if full_scale > 0.0 && value.is_finite() {
            (value / full_scale).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let height = (ratio * self.bar_height_px as f32) as u32;
        let red = (RED_AT_FULL_SCALE * ratio) as u8;
        let blue = 255 - red;
        (height, format!("#{:02x}44{:02x}", red, blue))
    }

    fn write_head(&self, out: &mut String) {
        let _ = write!(
            out,
            "<html><head>\n\
             <title>Shower Monitor</title>\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <link rel=\"icon\" href=\"data:,\">\n\
             <style>\n\
             .barbox {{text-align: center; vertical-align: bottom;}}\n\
             .bar {{width: {w}px; display: inline-block; padding: 0px;}}\n\
             .bartext {{font-family: \"Times New Roman\", Times, serif;}}\n\
             .box {{border: 2px solid black; padding: 10px; background-color: white; color: black; \
             width: 100px; height: 75px; margin: 0 auto; display: inline-block; font-size: 170%;}}\n\
             .slider {{width: 100%;}}\n\
             th, td {{padding-left: 20px; padding-right: 20px;}}\n\
             </style>\n\
             </head>\n<body>\n",
            w = self.bar_width_px,
        );
    }

    fn write_summary(&self, out: &mut String, page: &PageModel<'_>) {
        let r = &page.readings;
        let _ = write!(
            out,
            "<table style=\"width:50%; text-align: center;\">\n\
             <tr><td>Current Avg Temp</td><td>Heater Status</td>\
             <td>Showers in Use</td><td>Water Usage</td></tr>\n\
             <tr>\
             <td><div class=\"box\">{:.1}&deg;C</div></td>\
             <td><div class=\"box\">{}</div></td>\
             <td><div class=\"box\">{}</div></td>\
             <td><div class=\"box\">{:.1} L/min</div></td>\
             </tr>\n</table>\n",
            r.mean_temperature(),
            if page.any_heater_on() { "ON" } else { "OFF" },
            r.occupied_count(),
            r.combined_flow(),
        );
    }

    fn write_chart(&self, out: &mut String, page: &PageModel<'_>) {
        out.push_str("<table border=\"1\" width=\"50%\">\n<tr class=\"barbox\">");
        for day in &page.days {
            let _ = write!(out, "<td>{}</td>", DAY_NAMES[day.day % DAY_NAMES.len()]);
        }
        out.push_str("</tr>\n<tr class=\"barbox\">\n");
        for day in &page.days {
            self.write_bars(out, day, page.full_scale);
        }
        out.push_str("</tr>\n<tr class=\"bartext\">\n");
        let (label, unit) = match page.history_source {
            HistorySource::CombinedFlow => ("Flow", "L/min"),
            HistorySource::MeanTemperature => ("Temp", "&deg;C"),
        };
        for day in &page.days {
            match day.extremes {
                Some(x) => {
                    let _ = writeln!(
                        out,
                        "<td>Max {label}: {:.1} {unit} ({}:00)<br>Min {label}: {:.1} {unit} ({}:00)</td>",
                        x.max,
                        page.slot_hour(x.max_index),
                        x.min,
                        page.slot_hour(x.min_index),
                    );
                }
                None => out.push_str("<td></td>\n"),
            }
        }
        out.push_str("</tr>\n</table>\n<br>\n");
    }

    fn write_bars(&self, out: &mut String, day: &DaySummary<'_>, full_scale: f32) {
        // Invisible full-height spacer keeps every column the same height.
        let _ = write!(
            out,
            "<td><span class=\"bar\" style=\"height: {}px; width: 0px; opacity: 0;\"></span>",
            self.bar_height_px
        );
        for &value in day.slots {
            let (height, colour) = self.bar_style(value, full_scale);
            let _ = write!(
                out,
                "<span class=\"bar\" style=\"height: {}px; background-color: {}\"></span>",
                height, colour
            );
        }
        out.push_str("</td>\n");
    }

    fn write_technician(&self, out: &mut String, page: &PageModel<'_>) {
        out.push_str(
            "<div style=\"background-color:#DDDDDD\">\n\
             <h3>The following section is restricted to technicians only:</h3>\n",
        );
        for (i, param) in THRESHOLD_PARAMS.iter().enumerate() {
            let r = &page.readings;
            let _ = write!(
                out,
                "<table>\n\
                 <tr><th><h3>Shower {n:02}</h3></th></tr>\n\
                 <tr><td>Status:</td><td>{status}</td><td style=\"text-align:center;\">HOT Threshold</td></tr>\n\
                 <tr><td>Water Temperature:</td><td>{temp:.1}&deg;C</td>\
                 <td><input type=\"range\" min=\"{min:.0}\" max=\"{max:.0}\" value=\"{value:.0}\" \
                 class=\"slider\" id=\"{param}\">{min:.0}&deg;C <span style=\"float:right\">{max:.0}&deg;C</span></td>\
                 <td style=\"border:1px solid black;\"><span id=\"value{n}\"></span>&deg;C</td></tr>\n\
                 <tr><td>Heater Status:</td><td>{heater}</td></tr>\n\
                 </table>\n<br>\n",
                n = i + 1,
                status = occupancy_label(r.presence[i]),
                temp = r.temperature_c[i],
                min = page.threshold_min,
                max = page.threshold_max,
                value = page.thresholds[i],
                param = param,
                heater = page.heaters[i].as_str(),
            );
        }
        out.push_str("</div>\n");
    }

    fn write_script(&self, out: &mut String) {
        out.push_str(
            "<script>\n\
             function updateURL() {\n\
             \x20 var base = window.location.href.split('?')[0];\n\
             \x20 window.location.replace(base + \"?threshold1=\" +\n\
             \x20   encodeURIComponent(document.getElementById(\"threshold1\").value) +\n\
             \x20   \"&threshold2=\" + encodeURIComponent(document.getElementById(\"threshold2\").value));\n\
             }\n\
             [1, 2].forEach(function (n) {\n\
             \x20 var slider = document.getElementById(\"threshold\" + n);\n\
             \x20 var output = document.getElementById(\"value\" + n);\n\
             \x20 output.innerHTML = slider.value;\n\
             \x20 slider.oninput = function () { output.innerHTML = this.value; };\n\
             \x20 slider.addEventListener(\"change\", updateURL);\n\
             });\n\
             </script>\n",
        );
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, page: &PageModel<'_>) -> String {
        let slots: usize = page.days.iter().map(|d| d.slots.len()).sum();
        let mut out = String::with_capacity(4096 + slots * 96);
        self.write_head(&mut out);
        self.write_summary(&mut out, page);
        self.write_chart(&mut out, page);
        self.write_technician(&mut out, page);
        self.write_script(&mut out);
        out.push_str("</body>\n</html>\n");
        out
    }
}
