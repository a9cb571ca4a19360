//! InfluxDB v2 line protocol 编码。
//!
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp_ns
//! ```

use domain::{FieldValue, Point};

/// 把一组数据点编码为以换行分隔的 line protocol 文本。
pub fn encode_points(points: &[Point]) -> String {
    points
        .iter()
        .map(encode_point)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 编码单个数据点。tag 按 key 排序，值为空的 tag 被省略。
pub fn encode_point(point: &Point) -> String {
    let mut line = escape_measurement(&point.measurement);

    let mut tags: Vec<_> = point
        .tags
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    tags.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (key, value) in tags {
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }

    line.push(' ');
    for (i, (key, value)) in point.fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&encode_field_value(value));
    }

    line.push(' ');
    line.push_str(&point.ts_ns.to_string());
    line
}

fn encode_field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Float(v) => v.to_string(),
        FieldValue::Boolean(v) => v.to_string(),
        FieldValue::String(v) => {
            let escaped = v.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
    }
}

fn escape_measurement(s: &str) -> String {
    escape_newlines(&s.replace(',', "\\,").replace(' ', "\\ "))
}

// tag key、tag value、field key 的转义规则相同。
fn escape_key(s: &str) -> String {
    escape_newlines(
        &s.replace(',', "\\,")
            .replace('=', "\\=")
            .replace(' ', "\\ "),
    )
}

// 未加引号的部分不能出现原始换行，否则一个点会被拆成多行。
fn escape_newlines(s: &str) -> String {
    s.replace('\n', "\\n").replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(measurement: &str) -> Point {
        let mut point = Point::new(measurement);
        point.set_time(1_000_000_000);
        point
    }

    #[test]
    fn number_point_with_unit() {
        let mut p = point("power");
        p.add_tag("unit", "C").add_field("temp1", 21.5);
        assert_eq!(encode_point(&p), "power,unit=C temp1=21.5 1000000000");
    }

    #[test]
    fn empty_unit_tag_is_omitted() {
        let mut p = point("power");
        p.add_tag("unit", "").add_field("counter", 3.0);
        assert_eq!(encode_point(&p), "power counter=3 1000000000");
    }

    #[test]
    fn boolean_and_string_fields() {
        let mut p = point("power");
        p.add_field("door1", true);
        assert_eq!(encode_point(&p), "power door1=true 1000000000");

        let mut p = point("power");
        p.add_field("label", "say \"hi\"");
        assert_eq!(encode_point(&p), "power label=\"say \\\"hi\\\"\" 1000000000");
    }

    #[test]
    fn tags_are_sorted() {
        let mut p = point("power");
        p.add_tag("unit", "kW")
            .add_tag("site", "north")
            .add_field("p1", 1.5);
        assert_eq!(encode_point(&p), "power,site=north,unit=kW p1=1.5 1000000000");
    }

    #[test]
    fn special_chars_are_escaped() {
        let mut p = point("my measurement");
        p.add_tag("unit", "m s,x")
            .add_field("field=key", "v");
        assert_eq!(
            encode_point(&p),
            "my\\ measurement,unit=m\\ s\\,x field\\=key=\"v\" 1000000000"
        );
    }

    #[test]
    fn newline_in_tag_value_stays_on_one_line() {
        let mut p = point("power");
        p.add_tag("unit", "C\nevil injected=1")
            .add_tag("site", "a\r\nb")
            .add_field("temp1", 21.5);
        let encoded = encode_points(&[p]);
        assert_eq!(encoded.lines().count(), 1);
        assert!(!encoded.contains('\r'));
        assert_eq!(
            encoded,
            "power,site=a\\r\\nb,unit=C\\nevil\\ injected\\=1 temp1=21.5 1000000000"
        );
    }

    #[test]
    fn newline_in_measurement_or_field_key_is_escaped() {
        let mut p = point("power\nx");
        p.add_field("id\n1", 1.0);
        assert_eq!(encode_point(&p), "power\\nx id\\n1=1 1000000000");
    }

    #[test]
    fn points_are_newline_separated() {
        let mut a = point("power");
        a.add_field("a", 1.0);
        let mut b = point("power");
        b.add_field("b", false);
        assert_eq!(
            encode_points(&[a, b]),
            "power a=1 1000000000\npower b=false 1000000000"
        );
        assert_eq!(encode_points(&[]), "");
    }
}
