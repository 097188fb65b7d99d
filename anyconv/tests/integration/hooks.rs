use core::fmt;

use anyconv::{
    ConvertError, MapStrAny, Object, Reflect, SetValue, ToBytes, UnmarshalJson, UnmarshalText, Value, object,
};
use anyconv_testhelpers::test;

#[derive(Reflect, Clone, Default, Debug, PartialEq)]
#[conv(unmarshal_text)]
struct Version {
    major: u32,
    minor: u32,
}

impl UnmarshalText for Version {
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), ConvertError> {
        let text = String::from_utf8_lossy(text);
        let (major, minor) = text
            .split_once('.')
            .ok_or_else(|| ConvertError::invalid_argument(format!("bad version {text:?}")))?;
        self.major = anyconv::to_u32(&major.to_owned())?;
        self.minor = anyconv::to_u32(&minor.to_owned())?;
        Ok(())
    }
}

#[test]
fn text_hook_takes_scalars() {
    #[derive(Reflect, Clone, Default)]
    struct Package {
        name: String,
        version: Version,
    }

    let mut pkg = Package::default();
    anyconv::to_struct(&object! { "name" => "x", "version" => "1.2" }, &mut pkg).unwrap();
    assert_eq!(pkg.version, Version { major: 1, minor: 2 });

    let mut v = Version::default();
    anyconv::scan(&1.5f64, &mut v).unwrap();
    assert_eq!(v, Version { major: 1, minor: 5 });
}

#[test]
fn text_hook_skips_structured_sources() {
    let mut v = Version::default();
    anyconv::scan(&object! { "major" => 3, "minor" => 4 }, &mut v).unwrap();
    assert_eq!(v, Version { major: 3, minor: 4 });
}

#[derive(Reflect, Clone, Default)]
#[conv(unmarshal_json)]
struct RawJson {
    text: String,
}

impl UnmarshalJson for RawJson {
    fn unmarshal_json(&mut self, json: &[u8]) -> Result<(), ConvertError> {
        self.text = String::from_utf8_lossy(json).into_owned();
        Ok(())
    }
}

#[test]
fn json_hook_gets_json_text() {
    let mut raw = RawJson::default();

    anyconv::scan(&"plain".to_owned(), &mut raw).unwrap();
    assert_eq!(raw.text, r#""plain""#);

    anyconv::scan(&r#"{"a":1}"#.to_owned(), &mut raw).unwrap();
    assert_eq!(raw.text, r#"{"a":1}"#);

    let nested = object! { "b" => vec![Value::from(1), Value::from(2)] };
    anyconv::scan(&nested, &mut raw).unwrap();
    assert_eq!(raw.text, r#"{"b":[1,2]}"#);

    anyconv::scan(&7u8, &mut raw).unwrap();
    assert_eq!(raw.text, "7");
}

#[derive(Reflect, Clone, Default)]
#[conv(set_value)]
struct Recorder {
    seen: Vec<String>,
}

impl SetValue for Recorder {
    fn set_value(&mut self, value: &dyn Reflect) {
        self.seen.push(anyconv::to_string(value).unwrap_or_default());
    }
}

#[test]
fn set_value_accepts_anything() {
    let mut rec = Recorder::default();
    anyconv::scan(&"a".to_owned(), &mut rec).unwrap();
    anyconv::scan(&2i32, &mut rec).unwrap();
    anyconv::scan(&vec![true], &mut rec).unwrap();
    assert_eq!(rec.seen, ["a", "2", "[true]"]);
}

#[derive(Reflect, Clone, Default)]
#[conv(display, to_bytes)]
struct Celsius {
    degrees: f64,
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}C", self.degrees)
    }
}

impl ToBytes for Celsius {
    fn to_bytes(&self) -> Vec<u8> {
        vec![self.degrees as u8]
    }
}

#[test]
fn display_and_bytes_forms() {
    let c = Celsius { degrees: 21.5 };
    assert_eq!(anyconv::to_string(&c).unwrap(), "21.5C");
    assert_eq!(anyconv::to_bytes(&c).unwrap(), [21]);

    #[derive(Reflect, Clone, Default)]
    struct Reading {
        label: String,
        raw: Vec<u8>,
    }

    #[derive(Reflect, Clone, Default)]
    struct Sensor {
        label: Celsius,
        raw: Celsius,
    }

    let sensor = Sensor {
        label: Celsius { degrees: 3.0 },
        raw: Celsius { degrees: 4.0 },
    };
    let mut reading = Reading::default();
    anyconv::to_struct(&sensor, &mut reading).unwrap();
    assert_eq!(reading.label, "3C");
    assert_eq!(reading.raw, [4]);
}

#[derive(Reflect, Clone, Default)]
#[conv(map_str_any)]
struct Settings {
    /// `key=value` pairs separated by `;`.
    spec: String,
}

impl MapStrAny for Settings {
    fn map_str_any(&self) -> Object {
        self.spec
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_owned(), Value::from(v)))
            .collect()
    }
}

#[test]
fn map_form_is_used_for_maps_and_structs() {
    let settings = Settings {
        spec: "width=80;height=24".into(),
    };

    let m = anyconv::to_map(&settings).unwrap().unwrap();
    assert_eq!(Value::Object(m).to_json_string(), r#"{"width":"80","height":"24"}"#);

    #[derive(Reflect, Clone, Default)]
    struct Screen {
        width: u16,
        height: u16,
    }
    let mut screen = Screen::default();
    anyconv::to_struct(&settings, &mut screen).unwrap();
    assert_eq!((screen.width, screen.height), (80, 24));
}
