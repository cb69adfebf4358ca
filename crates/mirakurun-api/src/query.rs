// Query-string encoding for the list/filter option structs.

use serde::{Serialize, Serializer};

use crate::error::Error;

/// Append the encoded options to `path`.
///
/// Options whose fields are all at their default encode to nothing, in which
/// case the path is returned without a `?`.
pub(crate) fn with_query<T: Serialize>(path: &str, opts: Option<&T>) -> Result<String, Error> {
    let Some(opts) = opts else {
        return Ok(path.to_owned());
    };

    let qs = serde_qs::to_string(opts)?;
    if qs.is_empty() {
        Ok(path.to_owned())
    } else {
        Ok(format!("{path}?{qs}"))
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(v: &bool) -> bool {
    !*v
}

/// Encode `true` as `1`. Paired with `skip_serializing_if = "is_false"`.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn bool_as_int<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*v))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{ChannelType, DecodeOptions, ServicesListOptions};

    #[test]
    fn none_leaves_path_alone() {
        let path = with_query::<DecodeOptions>("services", None).unwrap();
        assert_eq!(path, "services");
    }

    #[test]
    fn default_options_add_no_question_mark() {
        let path = with_query("services", Some(&ServicesListOptions::default())).unwrap();
        assert_eq!(path, "services");

        let path = with_query("services/1/stream", Some(&DecodeOptions::default())).unwrap();
        assert_eq!(path, "services/1/stream");
    }

    #[test]
    fn decode_flag_is_sent_as_one() {
        let path =
            with_query("services/1/stream", Some(&DecodeOptions { decode: true })).unwrap();
        assert_eq!(path, "services/1/stream?decode=1");
    }

    #[test]
    fn set_fields_are_encoded() {
        let opts = ServicesListOptions {
            service_id: Some(1024),
            channel_type: Some(ChannelType::Gr),
            ..ServicesListOptions::default()
        };
        let path = with_query("services", Some(&opts)).unwrap();
        assert!(path.starts_with("services?"));
        assert!(path.contains("serviceId=1024"));
        assert!(path.contains("channel.type=GR"));
        assert!(!path.contains("networkId"));
    }
}
