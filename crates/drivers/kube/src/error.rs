//! Mapping of `kube` errors into [`PortsError`].

use brig_ports::PortsError;

/// Map a `kube` client error about `entity`/`id` into a [`PortsError`].
///
/// API refusals keep their meaning (404 is not-found, 403 is permission or
/// quota, 400/422 is an invalid spec). Anything that never reached the API
/// server is a connection error.
pub fn map_kube_error(err: kube::Error, entity: &str, id: &str) -> PortsError {
    match err {
        kube::Error::Api(response) => match response.code {
            404 => PortsError::not_found(entity, id),
            403 if response.message.contains("exceeded quota") => {
                PortsError::QuotaExceeded(response.message)
            }
            401 | 403 => PortsError::PermissionDenied(response.message),
            400 | 422 => PortsError::InvalidSpec(response.message),
            409 => PortsError::Internal(format!("{entity} {id} already exists: {}", response.message)),
            code if code >= 500 => PortsError::Connection(response.message),
            _ => PortsError::Internal(response.message),
        },
        kube::Error::SerdeError(e) => PortsError::Serialization(e.to_string()),
        other => PortsError::Connection(other.to_string()),
    }
}

/// Returns `true` if `err` is an API 404.
pub(crate) fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}
