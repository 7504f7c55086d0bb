//! Embedded template bodies for every artifact kind.
//!
//! Templates are compiled into the binary and registered with Tera at
//! registry construction. Conditional blocks (JWT verification, service
//! imports, render hook) are expressed as template sections toggled by
//! context flags rather than spliced strings.

/// Server route stub: class declaration plus validation/execution stages
pub const ROUTE_STUB: &str = r#""use strict";

const { validator, runValidation } = require('apiforge').Utility;{% if service %}
const { {{ service.symbols | join(sep=", ") }} } = require('{{ service.module }}');{% endif %}

class {{ class_name }} {

  constructor() {
    this.method    = '{{ method }}';
    this.uri       = '{{ uri }}';
    this.type      = '{{ content_type }}';
    this.enableJWT = {{ enable_jwt }};
    this.schema    = {{ schema_js }};
  }

  register() {
    return [this.uri, validate, execute];
  }

}

function *validate(next) {
  let aggregatedParams = Object.assign({}, this.params, this.query, this.request.body);{% if enable_jwt %}
  if (api.enableJWT === true) {
    const jwtSecret = require('apiforge').Instance.config.app.jwtSecret;
    const authorization = (this.headers.authorization || '').split(' ');
    const decoded = require('apiforge').Utility.jwt.verify(authorization[1], jwtSecret);
    if (decoded === false) {
      this.throw('no access', 403);
    }
  }{% endif %}
  yield runValidation(aggregatedParams, api.schema, { allowUnknown: true });
  yield next;
}

function *execute(next) {
{%- if render %}
  this.body = yield require('apiforge').Instance.template.render('{{ render.view }}', Object.assign({}, this.params, this.query));{% endif %}
}

const api = new {{ class_name }}();

module.exports = api;
"#;

/// Data-model stub bound to the ORM layer by model name
pub const MODEL_STUB: &str = r#""use strict";

const OrmHandler = require('apiforge').Instance.orm;
const OrmModel = require('apiforge').Orm.OrmModel;

class {{ class_name }}Model extends OrmModel {

  constructor() {
    super();
    this.name        = '{{ name }}';
    this.instance    = OrmHandler.getModel(this.name);
    this.identifyKey = '{{ shard_key }}';
    this.schema      = {{ schema_json }};
  }

}

const model = new {{ class_name }}Model();

module.exports = model;
"#;

/// Browser-transport client function (GET is the only fully implemented verb)
pub const SDK_BROWSER_GET: &str = r#"ApiforgeClient.prototype.{{ fn_name }} = function ({{ arg_list }}) {
  var _this = this;
  var aggParams = [{{ agg_params }}];
  var requiredParams = [{{ required_params }}];

  var data = null;
  try {
    data = _this.handleParams(arguments, aggParams, requiredParams);
  } catch (err) {
    return Promise.reject(err);
  }

  var url = '{{ base_url }}' + _this.buildUri('{{ uri }}', data);
  return _this.sendRequest('{{ method }}', url, data, {{ timeout_ms }});
};

"#;

/// Server-side proxy client function (GET is the only fully implemented verb)
pub const SDK_PROXY_GET: &str = r#"ApiforgeServer.prototype.{{ fn_name }} = function ({{ arg_list }}) {
  var _this = this;
  var aggParams = [{{ agg_params }}];
  var requiredParams = [{{ required_params }}];

  var data = null;
  try {
    data = _this.handleParams(arguments, aggParams, requiredParams);
  } catch (err) {
    return Promise.reject(err);
  }

  return _this.callFunc({
    fileName: '{{ require_path }}',
    data: data
  });
};

"#;

/// Signature-only stub for verbs without a full SDK implementation
pub const SDK_NOOP: &str = r#"{{ sdk_object }}.prototype.{{ fn_name }} = function ({{ arg_list }}) {
};

"#;

/// Shared runtime helpers seeding the browser-transport SDK module
pub const CLIENT_SDK_HEAD: &str = r#""use strict";

var ApiforgeClient = function () {};

ApiforgeClient.prototype.handleParams = function (args, aggParams, requiredParams) {
  var data = {};

  aggParams.forEach(function (key, index) {
    var value = args[index];
    if (requiredParams.indexOf(key) >= 0 && (value === undefined || value === '')) {
      throw new Error('Param ' + key + ' is required!');
    }
    if (value === undefined) {
      return;
    }
    data[key] = value;
  });

  return data;
};

ApiforgeClient.prototype.buildUri = function (uri, data) {
  // consumes substituted keys so sendRequest can query-append the rest
  return uri.replace(/:([A-Za-z_][A-Za-z0-9_]*)/g, function (match, key) {
    if (!data.hasOwnProperty(key)) {
      return match;
    }
    var value = data[key];
    delete data[key];
    return encodeURIComponent(value);
  });
};

ApiforgeClient.prototype.sendRequest = function (method, url, data, timeout) {
  var query = Object.keys(data).map(function (key) {
    return encodeURIComponent(key) + '=' + encodeURIComponent(data[key]);
  }).join('&');
  if (query !== '') {
    url = url + (url.indexOf('?') >= 0 ? '&' : '?') + query;
  }

  var controller = new AbortController();
  var timer = setTimeout(function () { controller.abort(); }, timeout);

  return fetch(url, {
    method: method.toUpperCase(),
    headers: { 'content-type': 'application/json; charset=utf-8' },
    signal: controller.signal
  }).then(function (response) {
    clearTimeout(timer);
    return response.json().then(function (body) {
      return { statusCode: response.status, response: body };
    });
  }, function (err) {
    clearTimeout(timer);
    throw err;
  });
};

"#;

/// Module export boilerplate closing the browser-transport SDK module
pub const CLIENT_SDK_TAIL: &str = "module.exports = new ApiforgeClient();\n";

/// Shared runtime helpers seeding the server-side proxy SDK module
pub const PROXY_SDK_HEAD: &str = r#""use strict";

var ApiforgeServer = function () {};

ApiforgeServer.prototype.callFunc = function (options) {
  var handler = require(options.fileName);
  var res = {
    response: {},
    statusText: '',
    statusCode: 200
  };

  return new Promise(function (resolve, reject) {
    handler.server(options.data).then(function (data) {
      res.response = data;
      resolve(res);
    }).catch(function (err) {
      res.statusCode = 500;
      res.statusText = String(err);
      reject(res);
    });
  });
};

ApiforgeServer.prototype.handleParams = function (args, aggParams, requiredParams) {
  var data = {};

  aggParams.forEach(function (key, index) {
    var value = args[index];
    if (requiredParams.indexOf(key) >= 0 && (value === undefined || value === '')) {
      throw new Error('Param ' + key + ' is required!');
    }
    if (value === undefined) {
      return;
    }
    data[key] = value;
  });

  return data;
};

"#;

/// Module export boilerplate closing the server-side proxy SDK module
pub const PROXY_SDK_TAIL: &str = "module.exports = new ApiforgeServer();\n";
