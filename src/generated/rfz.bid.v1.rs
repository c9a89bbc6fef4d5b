#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateBidRequest {
    #[prost(string, tag = "1")]
    pub asset_id: ::prost::alloc::string::String,
    #[prost(float, tag = "2")]
    pub amount: f32,
    #[prost(message, optional, tag = "3")]
    pub last_until: ::core::option::Option<::prost_types::Timestamp>,
}
impl ::prost::Name for CreateBidRequest {
    const NAME: &'static str = "CreateBidRequest";
    const PACKAGE: &'static str = "rfz.bid.v1";
    fn full_name() -> ::prost::alloc::string::String {
        ::prost::alloc::format!("rfz.bid.v1.{}", Self::NAME)
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateBidResponse {
    #[prost(int64, tag = "1")]
    pub bid_id: i64,
    #[prost(string, tag = "2")]
    pub asset_id: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub session_id: i64,
    #[prost(float, tag = "4")]
    pub amount: f32,
    #[prost(float, tag = "5")]
    pub quantity: f32,
    #[prost(message, optional, tag = "6")]
    pub last_until: ::core::option::Option<::prost_types::Timestamp>,
}
impl ::prost::Name for CreateBidResponse {
    const NAME: &'static str = "CreateBidResponse";
    const PACKAGE: &'static str = "rfz.bid.v1";
    fn full_name() -> ::prost::alloc::string::String {
        ::prost::alloc::format!("rfz.bid.v1.{}", Self::NAME)
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BidRecord {
    #[prost(int64, tag = "1")]
    pub bid_id: i64,
    #[prost(string, tag = "2")]
    pub asset_id: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub session_id: i64,
    #[prost(string, tag = "4")]
    pub placed_by: ::prost::alloc::string::String,
    #[prost(float, tag = "5")]
    pub amount: f32,
    #[prost(float, tag = "6")]
    pub quantity: f32,
    #[prost(string, tag = "7")]
    pub symbol: ::prost::alloc::string::String,
    #[prost(string, tag = "8")]
    pub status: ::prost::alloc::string::String,
    #[prost(bool, tag = "9")]
    pub accepted: bool,
    #[prost(message, optional, tag = "10")]
    pub placed_at: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "11")]
    pub last_until: ::core::option::Option<::prost_types::Timestamp>,
}
impl ::prost::Name for BidRecord {
    const NAME: &'static str = "BidRecord";
    const PACKAGE: &'static str = "rfz.bid.v1";
    fn full_name() -> ::prost::alloc::string::String {
        ::prost::alloc::format!("rfz.bid.v1.{}", Self::NAME)
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserBidRequest {
    #[prost(string, tag = "1")]
    pub user_fp: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub asset_id: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub offset: i64,
    #[prost(int64, tag = "4")]
    pub limit: i64,
}
impl ::prost::Name for GetUserBidRequest {
    const NAME: &'static str = "GetUserBidRequest";
    const PACKAGE: &'static str = "rfz.bid.v1";
    fn full_name() -> ::prost::alloc::string::String {
        ::prost::alloc::format!("rfz.bid.v1.{}", Self::NAME)
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUserBidResponse {
    #[prost(message, repeated, tag = "1")]
    pub bids: ::prost::alloc::vec::Vec<BidRecord>,
    #[prost(int64, tag = "2")]
    pub offset: i64,
    #[prost(int64, tag = "3")]
    pub row_count: i64,
    #[prost(int64, tag = "4")]
    pub total_results: i64,
}
impl ::prost::Name for GetUserBidResponse {
    const NAME: &'static str = "GetUserBidResponse";
    const PACKAGE: &'static str = "rfz.bid.v1";
    fn full_name() -> ::prost::alloc::string::String {
        ::prost::alloc::format!("rfz.bid.v1.{}", Self::NAME)
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamOpenBidsRequest {
    #[prost(string, tag = "1")]
    pub asset_id: ::prost::alloc::string::String,
    #[prost(int64, tag = "2")]
    pub offset: i64,
    #[prost(int64, tag = "3")]
    pub limit: i64,
}
impl ::prost::Name for StreamOpenBidsRequest {
    const NAME: &'static str = "StreamOpenBidsRequest";
    const PACKAGE: &'static str = "rfz.bid.v1";
    fn full_name() -> ::prost::alloc::string::String {
        ::prost::alloc::format!("rfz.bid.v1.{}", Self::NAME)
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamOpenBidsResponse {
    #[prost(message, repeated, tag = "1")]
    pub bids: ::prost::alloc::vec::Vec<BidRecord>,
}
impl ::prost::Name for StreamOpenBidsResponse {
    const NAME: &'static str = "StreamOpenBidsResponse";
    const PACKAGE: &'static str = "rfz.bid.v1";
    fn full_name() -> ::prost::alloc::string::String {
        ::prost::alloc::format!("rfz.bid.v1.{}", Self::NAME)
    }
}
/// Generated client implementations.
pub mod bid_service_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    use tonic::codegen::http::Uri;
    /// BidService accepts bids against the active session of an asset and serves
    /// historical bid lookups. CreateBid requires the caller fingerprint in the
    /// `x-rfz-user` metadata header.
    #[derive(Debug, Clone)]
    pub struct BidServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl BidServiceClient<tonic::transport::Channel> {
        /// Attempt to create a new client by connecting to a given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> BidServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> BidServiceClient<InterceptedService<T, F>>
        where
            F: tonic::service::Interceptor,
            T::ResponseBody: Default,
            T: tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
                Response = http::Response<
                    <T as tonic::client::GrpcService<tonic::body::BoxBody>>::ResponseBody,
                >,
            >,
            <T as tonic::codegen::Service<
                http::Request<tonic::body::BoxBody>,
            >>::Error: Into<StdError> + Send + Sync,
        {
            BidServiceClient::new(InterceptedService::new(inner, interceptor))
        }
        /// Compress requests with the given encoding.
        ///
        /// This requires the server to support it otherwise it might respond with an
        /// error.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.send_compressed(encoding);
            self
        }
        /// Enable decompressing responses.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.inner = self.inner.accept_compressed(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_encoding_message_size(limit);
            self
        }
        pub async fn create_bid(
            &mut self,
            request: impl tonic::IntoRequest<super::CreateBidRequest>,
        ) -> std::result::Result<
            tonic::Response<super::CreateBidResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/rfz.bid.v1.BidService/CreateBid",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("rfz.bid.v1.BidService", "CreateBid"));
            self.inner.unary(req, path, codec).await
        }
        pub async fn get_user_bid(
            &mut self,
            request: impl tonic::IntoRequest<super::GetUserBidRequest>,
        ) -> std::result::Result<
            tonic::Response<super::GetUserBidResponse>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/rfz.bid.v1.BidService/GetUserBid",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("rfz.bid.v1.BidService", "GetUserBid"));
            self.inner.unary(req, path, codec).await
        }
        pub async fn stream_open_bids(
            &mut self,
            request: impl tonic::IntoRequest<super::StreamOpenBidsRequest>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::StreamOpenBidsResponse>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| {
                    tonic::Status::new(
                        tonic::Code::Unknown,
                        format!("Service was not ready: {}", e.into()),
                    )
                })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(
                "/rfz.bid.v1.BidService/StreamOpenBids",
            );
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("rfz.bid.v1.BidService", "StreamOpenBids"));
            self.inner.server_streaming(req, path, codec).await
        }
    }
}
/// Generated server implementations.
pub mod bid_service_server {
    #![allow(unused_variables, dead_code, missing_docs, clippy::let_unit_value)]
    use tonic::codegen::*;
    /// Generated trait containing gRPC methods that should be implemented for use with BidServiceServer.
    #[async_trait]
    pub trait BidService: Send + Sync + 'static {
        async fn create_bid(
            self: std::sync::Arc<Self>,
            request: tonic::Request<super::CreateBidRequest>,
        ) -> std::result::Result<
            tonic::Response<super::CreateBidResponse>,
            tonic::Status,
        >;
        async fn get_user_bid(
            self: std::sync::Arc<Self>,
            request: tonic::Request<super::GetUserBidRequest>,
        ) -> std::result::Result<
            tonic::Response<super::GetUserBidResponse>,
            tonic::Status,
        >;
        /// Server streaming response type for the StreamOpenBids method.
        type StreamOpenBidsStream: tonic::codegen::tokio_stream::Stream<
                Item = std::result::Result<
                    super::StreamOpenBidsResponse,
                    tonic::Status,
                >,
            >
            + Send
            + 'static;
        async fn stream_open_bids(
            self: std::sync::Arc<Self>,
            request: tonic::Request<super::StreamOpenBidsRequest>,
        ) -> std::result::Result<
            tonic::Response<Self::StreamOpenBidsStream>,
            tonic::Status,
        >;
    }
    /// BidService accepts bids against the active session of an asset and serves
    /// historical bid lookups. CreateBid requires the caller fingerprint in the
    /// `x-rfz-user` metadata header.
    #[derive(Debug)]
    pub struct BidServiceServer<T: BidService> {
        inner: _Inner<T>,
        accept_compression_encodings: EnabledCompressionEncodings,
        send_compression_encodings: EnabledCompressionEncodings,
        max_decoding_message_size: Option<usize>,
        max_encoding_message_size: Option<usize>,
    }
    struct _Inner<T>(Arc<T>);
    impl<T: BidService> BidServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }
        pub fn from_arc(inner: Arc<T>) -> Self {
            let inner = _Inner(inner);
            Self {
                inner,
                accept_compression_encodings: Default::default(),
                send_compression_encodings: Default::default(),
                max_decoding_message_size: None,
                max_encoding_message_size: None,
            }
        }
        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> InterceptedService<Self, F>
        where
            F: tonic::service::Interceptor,
        {
            InterceptedService::new(Self::new(inner), interceptor)
        }
        /// Enable decompressing requests with the given encoding.
        #[must_use]
        pub fn accept_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.accept_compression_encodings.enable(encoding);
            self
        }
        /// Compress responses with the given encoding, if the client supports it.
        #[must_use]
        pub fn send_compressed(mut self, encoding: CompressionEncoding) -> Self {
            self.send_compression_encodings.enable(encoding);
            self
        }
        /// Limits the maximum size of a decoded message.
        ///
        /// Default: `4MB`
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.max_decoding_message_size = Some(limit);
            self
        }
        /// Limits the maximum size of an encoded message.
        ///
        /// Default: `usize::MAX`
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.max_encoding_message_size = Some(limit);
            self
        }
    }
    impl<T, B> tonic::codegen::Service<http::Request<B>> for BidServiceServer<T>
    where
        T: BidService,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/rfz.bid.v1.BidService/CreateBid" => {
                    #[allow(non_camel_case_types)]
                    struct CreateBidSvc<T: BidService>(pub Arc<T>);
                    impl<T: BidService> tonic::server::UnaryService<super::CreateBidRequest>
                    for CreateBidSvc<T> {
                        type Response = super::CreateBidResponse;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::CreateBidRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as BidService>::create_bid(inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = CreateBidSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/rfz.bid.v1.BidService/GetUserBid" => {
                    #[allow(non_camel_case_types)]
                    struct GetUserBidSvc<T: BidService>(pub Arc<T>);
                    impl<T: BidService> tonic::server::UnaryService<super::GetUserBidRequest>
                    for GetUserBidSvc<T> {
                        type Response = super::GetUserBidResponse;
                        type Future = BoxFuture<
                            tonic::Response<Self::Response>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::GetUserBidRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as BidService>::get_user_bid(inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = GetUserBidSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/rfz.bid.v1.BidService/StreamOpenBids" => {
                    #[allow(non_camel_case_types)]
                    struct StreamOpenBidsSvc<T: BidService>(pub Arc<T>);
                    impl<
                        T: BidService,
                    > tonic::server::ServerStreamingService<super::StreamOpenBidsRequest>
                    for StreamOpenBidsSvc<T> {
                        type Response = super::StreamOpenBidsResponse;
                        type ResponseStream = T::StreamOpenBidsStream;
                        type Future = BoxFuture<
                            tonic::Response<Self::ResponseStream>,
                            tonic::Status,
                        >;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::StreamOpenBidsRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            let fut = async move {
                                <T as BidService>::stream_open_bids(inner, request).await
                            };
                            Box::pin(fut)
                        }
                    }
                    let accept_compression_encodings = self.accept_compression_encodings;
                    let send_compression_encodings = self.send_compression_encodings;
                    let max_decoding_message_size = self.max_decoding_message_size;
                    let max_encoding_message_size = self.max_encoding_message_size;
                    let inner = self.inner.clone();
                    let fut = async move {
                        let inner = inner.0;
                        let method = StreamOpenBidsSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec)
                            .apply_compression_config(
                                accept_compression_encodings,
                                send_compression_encodings,
                            )
                            .apply_max_message_size_config(
                                max_decoding_message_size,
                                max_encoding_message_size,
                            );
                        let res = grpc.server_streaming(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => {
                    Box::pin(async move {
                        Ok(
                            http::Response::builder()
                                .status(200)
                                .header("grpc-status", "12")
                                .header("content-type", "application/grpc")
                                .body(empty_body())
                                .unwrap(),
                        )
                    })
                }
            }
        }
    }
    impl<T: BidService> Clone for BidServiceServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self {
                inner,
                accept_compression_encodings: self.accept_compression_encodings,
                send_compression_encodings: self.send_compression_encodings,
                max_decoding_message_size: self.max_decoding_message_size,
                max_encoding_message_size: self.max_encoding_message_size,
            }
        }
    }
    impl<T: BidService> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(Arc::clone(&self.0))
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: BidService> tonic::server::NamedService for BidServiceServer<T> {
        const NAME: &'static str = "rfz.bid.v1.BidService";
    }
}
